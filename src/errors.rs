use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PingError {
    #[error("Error resolving host {host}: {reason}")]
    Resolution { host: String, reason: String },

    #[error("Socket creation failed: {0}\nYou must run this program as root (sudo).")]
    PermissionDenied(io::Error),

    #[error("Socket setup failed: {0}")]
    Socket(io::Error),

    #[error("Send failed: {0}")]
    Send(io::Error),

    #[error("Receive failed: {0}")]
    Receive(io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_hint() {
        let err = PingError::PermissionDenied(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().contains("run this program as root"));
    }

    #[test]
    fn test_resolution_message() {
        let err = PingError::Resolution { host: "nowhere".into(), reason: "no IPv4 address".into() };
        assert_eq!(err.to_string(), "Error resolving host nowhere: no IPv4 address");
    }
}
