//! `configure`: interactive setup of the config file

use crate::config::Config;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    if current.is_empty() {
        write!(output, "{}: ", label)?;
    } else {
        write!(output, "{} [{}]: ", label, current)?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("failed to read input")?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// Prompt for url, token and default spaces; an empty answer keeps the current value
pub fn prompt<R: BufRead, W: Write>(current: &Config, input: &mut R, output: &mut W) -> Result<Config> {
    let mut config = current.clone();

    if let Some(url) = ask(input, output, "Spinup URL", current.url.as_deref().unwrap_or(""))? {
        config.url = Some(url);
    }

    let masked = current.masked();
    if let Some(token) = ask(input, output, "Spinup token", masked.token.as_deref().unwrap_or(""))? {
        config.token = Some(token);
    }

    let spaces = current.spaces.join(",");
    if let Some(answer) = ask(input, output, "Default spaces (comma separated)", &spaces)? {
        config.spaces = answer
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    Ok(config)
}

/// Run the prompts on stdin and write the result to `path`
pub fn run(path: &Path) -> Result<()> {
    let current = Config::load_from(path)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let config = prompt(&current, &mut stdin.lock(), &mut stdout)?;
    config.save_to(path)?;
    writeln!(stdout, "Wrote {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_keeps_current_on_empty_answers() {
        let current = Config {
            url: Some("https://spinup.example.edu".to_string()),
            token: Some("abcdefghijklmnop".to_string()),
            spaces: vec!["teamA".to_string()],
            ..Default::default()
        };
        let mut input = Cursor::new("\n\nteamB, teamC\n");
        let mut output = Vec::new();
        let config = prompt(&current, &mut input, &mut output).unwrap();

        assert_eq!(config.url, current.url);
        assert_eq!(config.token, current.token);
        assert_eq!(config.spaces, vec!["teamB", "teamC"]);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[abcd********]"));
        assert!(!shown.contains("abcdefghijklmnop"));
    }

    #[test]
    fn test_run_round_trip_via_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".spinup.json");
        let mut input = Cursor::new("https://spinup.example.edu\n\nteamA\n");
        let config = prompt(&Config::default(), &mut input, &mut Vec::new()).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.url.as_deref(), Some("https://spinup.example.edu"));
        assert_eq!(loaded.token, None);
        assert_eq!(loaded.spaces, vec!["teamA"]);
    }
}
