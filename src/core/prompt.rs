//! System prompt loading and tenant clause injection

use std::fs;
use std::path::Path;

/// File name looked up in the working directory
pub const SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";

/// Fallback when no prompt file is available
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant with access to Reltio AgentFlow MCP Server tools.";

/// Load the system prompt from `system_prompt.txt` in the working directory
pub fn load_system_prompt() -> String {
    load_system_prompt_from(Path::new(SYSTEM_PROMPT_FILE))
}

/// Load a system prompt from `path`, falling back to the default prompt
///
/// Missing, unreadable and blank files all yield [`DEFAULT_SYSTEM_PROMPT`].
pub fn load_system_prompt_from(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => {
            let content = content.trim();
            if content.is_empty() {
                tracing::debug!("[SystemPrompt] {:?} is empty, using default", path);
                DEFAULT_SYSTEM_PROMPT.to_string()
            } else {
                tracing::info!("[SystemPrompt] Loaded system prompt from {:?}", path);
                content.to_string()
            }
        }
        Err(e) => {
            tracing::debug!("[SystemPrompt] Could not read {:?} ({}), using default", path, e);
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}

/// Append the mandatory tenant clause to a base prompt
pub fn compose_system_prompt(base: &str, tenant_id: &str) -> String {
    format!(
        "{}\n\n For all MCP tool executions, you must use {} as the tenant_id of the tool input.",
        base, tenant_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = load_system_prompt_from(&dir.path().join("system_prompt.txt"));
        assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_file_content_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  You are a data steward assistant.  \n").unwrap();

        let prompt = load_system_prompt_from(file.path());
        assert_eq!(prompt, "You are a data steward assistant.");
    }

    #[test]
    fn test_blank_file_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t\n").unwrap();

        assert_eq!(load_system_prompt_from(file.path()), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_compose_contains_tenant() {
        let prompt = compose_system_prompt("Be brief.", "tenant_abc123");
        assert!(prompt.starts_with("Be brief."));
        assert!(prompt.contains("tenant_abc123"));
        assert!(prompt.ends_with("as the tenant_id of the tool input."));
    }
}
