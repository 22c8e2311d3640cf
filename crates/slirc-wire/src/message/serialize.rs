use std::fmt::{self, Display, Formatter};

use super::types::RawMessage;

/// Renders the line without a CRLF terminator.
impl Display for RawMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref tags) = self.tags {
            write!(f, "@{} ", tags)?;
        }

        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        f.write_str(&self.command)?;

        for param in &self.params {
            write!(f, " {}", param)?;
        }

        if let Some(ref trailing) = self.trailing {
            write!(f, " :{}", trailing)?;
        }

        Ok(())
    }
}
