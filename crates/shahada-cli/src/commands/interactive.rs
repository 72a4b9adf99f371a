//! Interactive command implementation
//!
//! Feeds stdin lines to a [`Dialogue`] and prints its prompts, rendering a
//! certificate each time a conversation completes.

use std::fs;
use std::io::{self, BufRead, Write};

use shahada::{fontdb::FontDatabase, CertificateFields, CertificateRenderer};

use super::load_resources;
use crate::cli::InteractiveArgs;
use crate::dialogue::{Dialogue, Reply, MESSAGE_DONE};
use crate::error::Result;

pub fn run(args: &InteractiveArgs) -> Result<()> {
    let resources = load_resources(&args.resources, &FontDatabase::new())?;
    let renderer = CertificateRenderer::builder().build();

    eprintln!("Type /start to begin, /cancel to abandon, Ctrl-D to quit.");

    let stdin = io::stdin();
    let completed = run_session(stdin.lock(), io::stdout(), |fields| {
        let bytes = renderer.render(
            &resources.template,
            fields,
            &resources.layout,
            resources.font.clone(),
        )?;
        fs::write(&args.output, bytes)?;
        log::info!("certificate written to {}", args.output.display());
        Ok(())
    })?;

    log::debug!("interactive session ended after {completed} certificates");
    Ok(())
}

/// Drive one dialogue until `input` runs out
///
/// `on_complete` receives each finished set of fields. A failed render is
/// reported on `output` and the session carries on. Returns how many
/// certificates were produced.
pub fn run_session<R, W, F>(input: R, mut output: W, mut on_complete: F) -> Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&CertificateFields) -> Result<()>,
{
    let mut dialogue = Dialogue::new();
    let mut completed = 0;

    for line in input.lines() {
        match dialogue.handle(&line?) {
            Reply::Prompt(prompt) => writeln!(output, "{prompt}")?,
            Reply::Cancelled(message) => writeln!(output, "{message}")?,
            Reply::Complete(fields) => match on_complete(&fields) {
                Ok(()) => {
                    completed += 1;
                    writeln!(output, "{MESSAGE_DONE}")?;
                },
                Err(e) => {
                    log::error!("certificate render failed: {e}");
                    writeln!(output, "Error: {e}")?;
                },
            },
            Reply::Ignored => {},
        }
        output.flush()?;
    }

    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{MESSAGE_CANCELLED, PROMPT_BODY, PROMPT_NAME, PROMPT_ROLE, PROMPT_TITLE};
    use crate::error::CliError;

    fn session(input: &str, fail: bool) -> (usize, Vec<CertificateFields>, String) {
        let mut seen = Vec::new();
        let mut output = Vec::new();
        let completed = run_session(input.as_bytes(), &mut output, |fields| {
            seen.push(fields.clone());
            if fail {
                Err(CliError::Usage("disk full".to_string()))
            } else {
                Ok(())
            }
        })
        .unwrap();
        (completed, seen, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_session_renders_completed_dialogue() {
        let (completed, seen, output) =
            session("/start\nشهادة\nمحمد\nمتطوع\nنص الشهادة\n", false);

        assert_eq!(completed, 1);
        assert_eq!(seen, [CertificateFields::new("شهادة", "محمد", "متطوع", "نص الشهادة")]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            [PROMPT_TITLE, PROMPT_NAME, PROMPT_ROLE, PROMPT_BODY, MESSAGE_DONE]
        );
    }

    #[test]
    fn test_session_cancel_and_restart() {
        let (completed, seen, output) =
            session("hello\n/start\na\n/cancel\n/start\nt\nn\nr\nb\n", false);

        assert_eq!(completed, 1);
        assert_eq!(seen, [CertificateFields::new("t", "n", "r", "b")]);
        assert!(output.contains(MESSAGE_CANCELLED));
    }

    #[test]
    fn test_render_failure_is_reported_and_session_continues() {
        let (completed, seen, output) = session("/start\na\nb\nc\nd\n/start\n", true);

        assert_eq!(completed, 0);
        assert_eq!(seen.len(), 1);
        assert!(output.contains("Error: disk full"));
        assert!(output.trim_end().ends_with(PROMPT_TITLE));
    }
}
