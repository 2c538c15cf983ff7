//! Chat session - the conversation loop over one repository

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::llm::{CompletionRequest, ContentBlock, LlmClient, Message, StopReason};
use crate::tools::{ToolContext, ToolExecutor};

use super::display::{self, ToolInvocation};

/// Interactive chat session bound to one cloned repository
pub struct ChatSession {
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
    ctx: ToolContext,
    conversation: Vec<Message>,
    system_prompt: String,
    max_tokens: u32,
}

impl ChatSession {
    /// Create a session over a prepared tool context
    pub fn new(llm: Arc<dyn LlmClient>, ctx: ToolContext, max_tokens: u32) -> Self {
        let system_prompt = format!(
            r#"You are an assistant answering questions about the GitHub repository
cloned from {}. Use the tools to inspect the repository instead of
guessing:
- file_qa: answer a question about one file (works on files of any size)
- search_path: find files and directories by glob pattern
- run_script: run a shell script in a fresh Wolfi container
- search_wolfi: find Wolfi apk package names by keyword

Ground every answer in tool output. If a file does not contain the
information, say so rather than inventing an answer."#,
            ctx.workspace.url()
        );

        Self {
            llm,
            executor: ToolExecutor::standard(),
            ctx,
            conversation: Vec::new(),
            system_prompt,
            max_tokens,
        }
    }

    /// Run the interactive loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if matches!(input, "exit" | "quit" | "/exit" | "/quit" | "/q") {
                        break;
                    }
                    if input == "/clear" {
                        self.conversation.clear();
                        println!("{}", "Conversation cleared.".dimmed());
                        continue;
                    }

                    if let Err(e) = self.process_user_input(input).await {
                        // Keep the session alive; the turn failed, not the REPL
                        println!("{} {}", "Error:".red(), e);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "repoqa".bright_cyan().bold());
        println!("Repository: {}", self.ctx.workspace.url());
        println!(
            "Ask anything about the repository. Type {} to quit, {} to reset.",
            "exit".yellow(),
            "/clear".yellow()
        );
        println!();
    }

    /// One user turn: call the model, run tools until it stops asking
    async fn process_user_input(&mut self, input: &str) -> Result<()> {
        debug!(chars = input.len(), "ChatSession::process_user_input: called");
        self.conversation.push(Message::user(input));

        loop {
            let request = CompletionRequest {
                system_prompt: self.system_prompt.clone(),
                messages: self.conversation.clone(),
                tools: self.executor.definitions(),
                max_tokens: self.max_tokens,
                temperature: None,
            };

            let response = self
                .llm
                .complete(request)
                .await
                .map_err(|e| eyre::eyre!("LLM error: {}", e))?;

            if let Some(ref content) = response.content {
                display::display_response(content);
            }

            match response.stop_reason {
                StopReason::ToolUse if !response.tool_calls.is_empty() => {
                    let mut blocks: Vec<ContentBlock> = Vec::new();
                    if let Some(ref content) = response.content {
                        blocks.push(ContentBlock::text(content));
                    }
                    for tc in &response.tool_calls {
                        blocks.push(ContentBlock::ToolUse {
                            id: tc.id.clone(),
                            name: tc.name.clone(),
                            input: tc.input.clone(),
                        });
                    }
                    self.conversation.push(Message::assistant_blocks(blocks));

                    let mut result_blocks: Vec<ContentBlock> = Vec::new();
                    for tc in &response.tool_calls {
                        let invocation = ToolInvocation::from_call(tc);
                        display::display_tool_invocation(&invocation);

                        let result = self.executor.execute(tc, &self.ctx).await;
                        display::display_tool_result(&result);

                        result_blocks.push(ContentBlock::tool_result(&tc.id, &result.content, result.is_error));
                    }
                    self.conversation.push(Message::user_blocks(result_blocks));
                    println!();
                }
                StopReason::MaxTokens => {
                    println!("{}", "\n[Response truncated - max tokens reached]".yellow());
                    if let Some(ref content) = response.content {
                        self.conversation.push(Message::assistant(content));
                    }
                    break;
                }
                _ => {
                    if let Some(ref content) = response.content {
                        self.conversation.push(Message::assistant(content));
                    }
                    break;
                }
            }
        }

        println!();
        Ok(())
    }
}
