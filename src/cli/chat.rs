//! Interactive chat loop

use anyhow::Result;

use super::console::Console;
use crate::client::ReltioAgentClient;

/// What a line of chat input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Quit,
    Health,
    Clear,
    /// Blank line
    Skip,
    Prompt(String),
}

impl ChatCommand {
    /// Commands are matched case-insensitively; anything else is a prompt
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "quit" | "exit" => ChatCommand::Quit,
            "health" => ChatCommand::Health,
            "clear" => ChatCommand::Clear,
            "" => ChatCommand::Skip,
            _ => ChatCommand::Prompt(input.to_string()),
        }
    }
}

/// Run the chat loop until `quit`/`exit` or end of input
pub async fn run_chat(client: &ReltioAgentClient, console: &Console) -> Result<()> {
    tracing::info!("Starting chat loop");
    console.print_banner(client.tenant_id());
    console.print_tools(client.tool_names());

    loop {
        let line = match console.read_input() {
            Ok(Some(line)) => line,
            Ok(None) => {
                console.println();
                console.print_system("Chat ended. Goodbye!");
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read user input: {}", e);
                console.print_error(&format!("Failed to read input: {}", e));
                break;
            }
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Quit => {
                tracing::info!("User requested exit");
                console.print_system("Goodbye!");
                break;
            }
            ChatCommand::Health => {
                console.print_system("Running health check...");
                let report = client.health_check().await;
                console.print_health(&report);
            }
            ChatCommand::Clear => console.clear_screen(),
            ChatCommand::Skip => continue,
            ChatCommand::Prompt(prompt) => {
                console.println();
                console.print_thinking();
                let result = client.process_prompt(&prompt).await;
                console.clear_thinking();

                match result {
                    Ok(response) => console.print_assistant(&response),
                    Err(e) => console.print_error(&format!("Error processing prompt: {:#}", e)),
                }

                console.println();
                console.print_separator();
            }
        }
    }

    tracing::info!("Chat loop ended");
    Ok(())
}
