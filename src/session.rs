//! # Interactive session
//!
//! The read-eval-print loop. The loop has exactly one steady state (awaiting
//! input) and one terminal transition, reached by any of: the literal `exit`
//! command, an interrupt signal, or end of input. All three resolve to the
//! same [`SessionEvent`] classification so the farewell path exists once.
//!
//! Timing and formatting of answers happens here: each response is printed as
//! `Response(<seconds> sec): <text>` with the elapsed wall-clock time rounded
//! to one decimal and leading newlines stripped from the response text.

use crossterm::{
    ExecutableCommand,
    cursor::MoveTo,
    terminal::{Clear, ClearType},
};
use std::{
    error::Error,
    io::Write,
    time::Instant,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    bootstrap::Workspace,
    config::AskPdfConfig,
    document,
    engine::{DocumentQueryEngine, QueryEngine},
};

/// What happened while waiting for input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One line read from the input stream.
    Line(String),
    /// Interrupt signal (Ctrl+C) during the wait.
    Interrupted,
    /// Input stream closed.
    Eof,
}

/// The loop's reaction to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Empty input: prompt again without touching the engine.
    Reprompt,
    /// Terminate gracefully (farewell, exit code 1).
    Terminate,
    /// Forward this prompt to the query engine.
    Ask(String),
}

/// Terminal state of a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionOutcome {
    /// The user ended the session (exit command, interrupt, or EOF).
    Terminated,
}

/// Map an input event onto the loop's next step.
///
/// The `exit` command, an interrupt and EOF all classify as [`Step::Terminate`];
/// whitespace-only lines classify as [`Step::Reprompt`]. Anything else is
/// forwarded verbatim.
pub fn classify(event: SessionEvent) -> Step {
    match event {
        SessionEvent::Line(line) => {
            if line.trim().is_empty() {
                Step::Reprompt
            } else if line == "exit" {
                Step::Terminate
            } else {
                Step::Ask(line)
            }
        }
        SessionEvent::Interrupted | SessionEvent::Eof => Step::Terminate,
    }
}

fn farewell<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\nGoodbye!\n")
}

/// Resolve when an interrupt signal arrives. If the handler cannot be
/// registered the future stays pending and termination is left to the other
/// input paths.
async fn interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => (),
        Err(_) => std::future::pending::<()>().await,
    }
}

/// Run the prompt/response loop until the user terminates it.
///
/// Generic over the engine, the input stream and the output sink so tests can
/// drive it with a scripted reader and a buffer. Engine errors are not caught:
/// they propagate out and end the process.
pub async fn run_loop<E, R, W>(
    engine: &mut E,
    reader: &mut R,
    out: &mut W,
) -> Result<SessionOutcome, Box<dyn Error>>
where
    E: QueryEngine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();

    loop {
        write!(out, "\nPrompt: ")?;
        out.flush()?;

        let event = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => SessionEvent::Line(line),
                None => SessionEvent::Eof,
            },
            _ = interrupt() => SessionEvent::Interrupted,
        };

        match classify(event) {
            Step::Reprompt => continue,
            Step::Terminate => {
                farewell(out)?;
                return Ok(SessionOutcome::Terminated);
            }
            Step::Ask(prompt) => {
                debug!("Submitting query: {:?}", prompt);
                let started = Instant::now();
                let response = engine.query(&prompt).await?;
                let elapsed = started.elapsed().as_secs_f64();

                writeln!(out)?;
                writeln!(
                    out,
                    "Response({:.1} sec): {}",
                    elapsed,
                    response.trim_start_matches('\n')
                )?;
                out.flush()?;
            }
        }
    }
}

/// Load the document, build the index, and hand the terminal over to the
/// interactive loop.
///
/// Prints progress while the index is built, clears the screen, then reads
/// prompts from standard input until the session terminates.
pub async fn run_session(
    workspace: &Workspace,
    config: AskPdfConfig,
) -> Result<SessionOutcome, Box<dyn Error>> {
    println!("Loading...");

    let document = document::load_document(&workspace.document_path)?;
    let mut engine = DocumentQueryEngine::build(config, &document).await?;
    debug!("Index ready with {} chunks", engine.indexed_chunks());

    let mut stdout = std::io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(MoveTo(0, 0))?;

    println!("Ready! Ask anything about the document");
    println!();
    println!("Press Ctrl+C to exit");

    let mut reader = BufReader::new(tokio::io::stdin());
    run_loop(&mut engine, &mut reader, &mut stdout).await
}
