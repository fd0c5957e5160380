//! Line-oriented prompts over any async reader/writer pair.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub struct Console {
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    writer: Box<dyn AsyncWrite + Unpin + Send>,
}

impl Console {
    pub fn new(
        reader: impl AsyncBufRead + Unpin + Send + 'static,
        writer: impl AsyncWrite + Unpin + Send + 'static,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    pub async fn write(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn println(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.write(text.as_ref()).await?;
        self.write("\n").await
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read from console")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask once; the answer is trimmed. End of input aborts the form.
    pub async fn prompt(&mut self, label: &str) -> Result<String> {
        self.write(label).await?;
        match self.read_line().await? {
            Some(answer) => Ok(answer.trim().to_string()),
            None => bail!("Input closed"),
        }
    }

    /// Ask until the answer is not blank.
    pub async fn prompt_required(&mut self, label: &str) -> Result<String> {
        loop {
            let answer = self.prompt(label).await?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.println("A value is required.").await?;
        }
    }

    /// Show the current value; a blank answer keeps it (`None`).
    pub async fn prompt_optional(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let answer = self.prompt(&format!("{label} ({current}): ")).await?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    /// Ask until the answer parses as `T`.
    pub async fn prompt_parsed<T>(&mut self, label: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        loop {
            let answer = self.prompt_required(label).await?;
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(e) => self.println(format!("{e}")).await?,
            }
        }
    }

    /// Like [`Self::prompt_optional`], parsing a non-blank answer as `T`.
    pub async fn prompt_parsed_optional<T>(
        &mut self,
        label: &str,
        current: &str,
    ) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        loop {
            let Some(answer) = self.prompt_optional(label, current).await? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.println(format!("{e}")).await?,
            }
        }
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N]: ")).await?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn console_with(input: &str) -> (Console, tokio::io::DuplexStream) {
        let (writer, reader) = tokio::io::duplex(64 * 1024);
        let input = std::io::Cursor::new(input.as_bytes().to_vec());
        (Console::new(input, writer), reader)
    }

    #[tokio::test]
    async fn prompt_trims_and_reports_closed_input() {
        let (mut console, _out) = console_with("  alice \n");
        assert_eq!(console.prompt("Username: ").await.unwrap(), "alice");
        assert!(console.prompt("Password: ").await.is_err());
    }

    #[tokio::test]
    async fn prompt_required_repeats_on_blank() {
        let (mut console, mut out) = console_with("\n\nvalue\n");
        assert_eq!(console.prompt_required("Name: ").await.unwrap(), "value");
        drop(console);

        let mut text = String::new();
        out.read_to_string(&mut text).await.unwrap();
        assert_eq!(text.matches("A value is required.").count(), 2);
    }

    #[tokio::test]
    async fn prompt_optional_blank_keeps_current() {
        let (mut console, _out) = console_with("\nnew\n");
        assert_eq!(console.prompt_optional("Email", "a@b.io").await.unwrap(), None);
        assert_eq!(
            console.prompt_optional("Email", "a@b.io").await.unwrap(),
            Some("new".to_string())
        );
    }

    #[tokio::test]
    async fn prompt_parsed_retries_until_valid() {
        let (mut console, _out) = console_with("many\n12\n");
        let n: i32 = console.prompt_parsed("Attendees: ").await.unwrap();
        assert_eq!(n, 12);
    }

    #[tokio::test]
    async fn confirm_accepts_yes_only() {
        let (mut console, _out) = console_with("Y\nno\n");
        assert!(console.confirm("Delete?").await.unwrap());
        assert!(!console.confirm("Delete?").await.unwrap());
    }
}
