//! German administrative areas are identified by a Regionalschlüssel ("regkey"). The full form
//! has 12 digits and identifies every level down to single municipalities. Shorter forms are
//! common: 2 digits for a state (Bundesland), 5 digits for a county (Kreis or kreisfreie Stadt).
//! See <https://de.wikipedia.org/wiki/Regionalschl%C3%BCssel>.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AdminLevel, IdentifierError};

const FULL_LENGTH: usize = 12;
const COUNTRY: &str = "DG0000000000";

/// A regkey, always normalized to the full 12-character form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Regkey(String);

impl Regkey {
    pub fn country() -> Regkey {
        Regkey(COUNTRY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_country(&self) -> bool {
        self.0 == COUNTRY
    }

    /// The coarsest level this key can describe, judging only by which digits are significant.
    pub fn implied_level(&self) -> AdminLevel {
        if self.is_country() {
            AdminLevel::Staat
        } else if self.0[2..].bytes().all(|b| b == b'0') {
            AdminLevel::Land
        } else if self.0[5..].bytes().all(|b| b == b'0') {
            AdminLevel::Kreis
        } else {
            AdminLevel::Gemeinde
        }
    }
}

impl FromStr for Regkey {
    type Err = IdentifierError;

    fn from_str(input: &str) -> Result<Regkey, IdentifierError> {
        let malformed = |reason| IdentifierError::MalformedRegkey {
            key: input.to_string(),
            reason,
        };

        if input == "DG" || input == COUNTRY {
            return Ok(Regkey::country());
        }
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("must only contain digits"));
        }
        if ![2, 5, FULL_LENGTH].contains(&input.len()) {
            return Err(malformed("must be 2, 5, or 12 digits long"));
        }
        let state: u8 = input[..2]
            .parse()
            .map_err(|_| malformed("must only contain digits"))?;
        if !(1..=16).contains(&state) {
            return Err(malformed("the state (first two digits) must be between 01 and 16"));
        }
        Ok(Regkey(format!("{:0<width$}", input, width = FULL_LENGTH)))
    }
}

impl TryFrom<String> for Regkey {
    type Error = IdentifierError;

    fn try_from(input: String) -> Result<Regkey, IdentifierError> {
        input.parse()
    }
}

impl From<Regkey> for String {
    fn from(key: Regkey) -> String {
        key.0
    }
}

impl fmt::Display for Regkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What somebody typed to pick an area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AreaIdentifier {
    Regkey(Regkey),
    /// Free text, matched against area names
    Name(String),
}

impl AreaIdentifier {
    /// Anything that looks numeric must be a valid regkey. Everything else is a name.
    pub fn parse(input: &str) -> Result<AreaIdentifier, IdentifierError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(IdentifierError::NotFound(input.to_string()));
        }
        if input == "DG" || input.bytes().all(|b| b.is_ascii_digit()) || input == COUNTRY {
            Ok(AreaIdentifier::Regkey(input.parse()?))
        } else {
            Ok(AreaIdentifier::Name(input.to_string()))
        }
    }
}
