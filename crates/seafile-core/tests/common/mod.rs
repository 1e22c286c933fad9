use std::io;

use seafile_core::CredentialPrompt;

/// Prompt that answers from fixed values and counts how often it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub username: String,
    pub password: String,
    pub otp: Option<String>,
    pub asked: usize,
    pub otp_asked: usize,
}

impl ScriptedPrompt {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    pub fn with_otp(mut self, otp: &str) -> Self {
        self.otp = Some(otp.to_string());
        self
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn username(&mut self) -> io::Result<String> {
        self.asked += 1;
        Ok(self.username.clone())
    }

    fn password(&mut self) -> io::Result<String> {
        self.asked += 1;
        Ok(self.password.clone())
    }

    fn otp_code(&mut self) -> io::Result<String> {
        self.otp_asked += 1;
        self.otp
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no OTP scripted"))
    }
}
