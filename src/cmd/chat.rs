use std::io::{self, Write};

use crate::context::AppContext;
use crate::domain::conversation::Conversation;
use crate::error::{AppError, AppResult};
use crate::workflow::intake::{self, TurnRequest};

/// Local intake session on stdin/stdout, driving the same turn handler as the
/// HTTP surface. Ends when the ticket is filed or on EOF.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    println!("Describe the failure you want to report. Press Ctrl-D to give up.");
    let mut history = Conversation::default();

    loop {
        let Some(message) = read_line("> ")? else {
            println!("\nNo ticket was filed.");
            return Ok(());
        };
        if message.is_empty() {
            continue;
        }

        let request = TurnRequest {
            message,
            history: history.clone(),
        };
        match intake::handle_turn(ctx, request).await {
            Ok(turn) => {
                println!("{}", turn.reply);
                history = turn.history;
                if turn.done {
                    return Ok(());
                }
            }
            Err(AppError::EmptyMessage) => continue,
            Err(err) => return Err(err),
        }
    }
}

fn read_line(prompt: &str) -> AppResult<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
