//! HTML rendering: the full home page and per-generation fragments.
//!
//! Rendering is a pure function of the record plus filesystem state and
//! has no side effects, so repeated renders of the same generation in the
//! same state produce byte-identical markup (the polling contract relies
//! on this). Templates auto-escape, so prompt text is safe to display
//! verbatim.

use std::sync::OnceLock;

use minijinja::{context, Environment, Value};

use magicgen_core::generation::{image_path, image_url};
use magicgen_db::models::generation::{Generation, GenerationStatus};

/// Out-of-band input swap that clears the prompt box after a submission.
const CLEAR_INPUT_OOB: &str =
    r#"<input id="new-prompt" name="prompt" placeholder="Enter a prompt" hx-swap-oob="true">"#;

fn env() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template("home.html", include_str!("../templates/home.html"))
            .expect("embedded home template must parse");
        env.add_template("preview.html", include_str!("../templates/preview.html"))
            .expect("embedded preview template must parse");
        env
    })
}

/// Display state of a generation, derived from its status column and the
/// presence of the image file.
///
/// A file on disk wins over a stale `pending` status: the image write
/// completes before the status update, and the original demo's contract
/// is that the file's existence alone flips the card.
fn display_state(g: &Generation) -> &'static str {
    if g.status == GenerationStatus::Ready || image_path(&g.folder, &g.id).exists() {
        "ready"
    } else if g.status == GenerationStatus::Failed {
        "failed"
    } else {
        "pending"
    }
}

/// Render the fragment for one generation: image card, failure notice,
/// or self-polling placeholder.
pub fn render_preview(g: &Generation) -> Result<String, minijinja::Error> {
    env().get_template("preview.html")?.render(context! {
        gen => Value::from_serialize(g),
        state => display_state(g),
        image_url => image_url(&g.id),
    })
}

/// Render the full home page with the given generations (newest first).
pub fn render_home(generations: &[Generation]) -> Result<String, minijinja::Error> {
    let previews = generations
        .iter()
        .map(render_preview)
        .collect::<Result<Vec<_>, _>>()?;

    env()
        .get_template("home.html")?
        .render(context! { previews => previews })
}

/// Render the response to a prompt submission: the new generation's
/// fragment plus an out-of-band swap clearing the input field.
pub fn render_submission(g: &Generation) -> Result<String, minijinja::Error> {
    let preview = render_preview(g)?;
    Ok(format!("{preview}\n{CLEAR_INPUT_OOB}"))
}
