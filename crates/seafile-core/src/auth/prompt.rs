use std::io::{self, BufRead, Write};

/// Source of logon credentials.
///
/// `SeafileClient::logon` asks for a username and password once, and for an
/// OTP code only when the server reports that two-factor auth is enabled.
pub trait CredentialPrompt {
    fn username(&mut self) -> io::Result<String>;

    /// Must not echo the password back to the user.
    fn password(&mut self) -> io::Result<String>;

    fn otp_code(&mut self) -> io::Result<String>;
}

/// Interactive prompt on the controlling terminal.
#[derive(Debug, Default, Clone)]
pub struct TerminalPrompt {
    default_username: Option<String>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `username` as the answer when the user just presses enter.
    pub fn with_default_username(mut self, username: Option<String>) -> Self {
        self.default_username = username.filter(|u| !u.is_empty());
        self
    }

    fn read_line(label: &str) -> io::Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn username(&mut self) -> io::Result<String> {
        match self.default_username {
            Some(ref last_user) => {
                let input = Self::read_line(&format!("Please enter your username [{}]: ", last_user))?;
                if input.is_empty() {
                    Ok(last_user.clone())
                } else {
                    Ok(input)
                }
            }
            None => Self::read_line("Please enter your username: "),
        }
    }

    fn password(&mut self) -> io::Result<String> {
        rpassword::prompt_password("Please enter your password: ")
    }

    fn otp_code(&mut self) -> io::Result<String> {
        Self::read_line("Please enter 2-factor OTP code: ")
    }
}
