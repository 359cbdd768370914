//! Whether a candidate URL actually serves an image.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Image { content_type: String },
    NotAnImage { content_type: String },
    Status(u16),
    Unreachable(String),
}

impl ProbeVerdict {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Image { content_type } => format!("loaded ({content_type})"),
            Self::NotAnImage { content_type } => format!("not an image ({content_type})"),
            Self::Status(code) => format!("HTTP {code}"),
            Self::Unreachable(reason) => reason.clone(),
        }
    }
}

pub fn classify(status: u16, content_type: &str) -> ProbeVerdict {
    if !(200..300).contains(&status) {
        return ProbeVerdict::Status(status);
    }
    let content_type = content_type.trim().to_ascii_lowercase();
    if content_type.starts_with("image/") {
        ProbeVerdict::Image { content_type }
    } else {
        ProbeVerdict::NotAnImage { content_type }
    }
}

/// Issues a GET and judges the response by status and content type. The
/// body is never read.
pub fn probe(url: &str, timeout: Duration) -> ProbeVerdict {
    let agent = ureq::AgentBuilder::new()
        .timeout(timeout)
        .redirects(5)
        .build();
    match agent.get(url).call() {
        Ok(resp) => classify(resp.status(), resp.content_type()),
        Err(ureq::Error::Status(code, _)) => ProbeVerdict::Status(code),
        Err(err) => ProbeVerdict::Unreachable(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_successful_image_responses_load() {
        assert!(classify(200, "image/png").is_loaded());
        assert!(classify(204, " Image/JPEG ").is_loaded());
        assert_eq!(
            classify(200, "text/html"),
            ProbeVerdict::NotAnImage {
                content_type: "text/html".into()
            }
        );
        assert_eq!(classify(404, "image/png"), ProbeVerdict::Status(404));
    }

    #[test]
    fn unreachable_host_is_a_failure() {
        let verdict = probe("http://127.0.0.1:9/never.png", Duration::from_millis(300));
        assert!(!verdict.is_loaded());
    }
}
