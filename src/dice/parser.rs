use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use super::types::{DiceError, Die, Kind, Pool, MAX_DICE};

/// One digit of skilled dice followed by `s`, then one digit of lucky dice followed by `l`.
static NOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<skilled>\d)s(?P<lucky>\d)l").unwrap());

/// Parse dice notation such as `"3s1l"` into a full pool.
///
/// The notation may sit anywhere inside `text`; only the first occurrence is
/// used. When no notation is present both counts are zero, which yields a
/// pool of only unskilled and unlucky dice.
///
/// ```
/// use six_d_six::dice::parse;
///
/// let pool = parse("!6d6 3s1l").unwrap();
/// assert_eq!(pool.skilled.len(), 3);
/// assert_eq!(pool.unlucky.len(), 2);
///
/// assert!(parse("4s0l").is_err());
/// ```
#[tracing::instrument(level = "debug")]
pub fn parse(text: &str) -> Result<Pool, DiceError> {
    let (skilled, lucky) = match NOTATION_REGEX.captures(text) {
        Some(caps) => (count(&caps["skilled"])?, count(&caps["lucky"])?),
        None => {
            tracing::debug!("No dice notation found, rolling an unskilled and unlucky pool");
            (0, 0)
        }
    };

    Pool::from_counts(skilled, lucky)
}

fn count(digits: &str) -> Result<usize, DiceError> {
    digits.parse::<usize>().map_err(|_| DiceError::NotANumber(digits.to_string()))
}

impl Pool {
    /// Build a pool holding `skilled` skilled dice and `lucky` lucky dice,
    /// filling the rest of each half with unskilled and unlucky dice.
    pub fn from_counts(skilled: usize, lucky: usize) -> Result<Self, DiceError> {
        let (skilled, unskilled) = fill(Kind::Skilled, skilled)?;
        let (lucky, unlucky) = fill(Kind::Lucky, lucky)?;

        Ok(Self { skilled, unskilled, lucky, unlucky })
    }
}

/// Returns `count` dice of `kind` and the complementary dice making up the half.
fn fill(kind: Kind, count: usize) -> Result<(Vec<Die>, Vec<Die>), DiceError> {
    if count > MAX_DICE {
        return Err(DiceError::PoolSizeExceeded { kind, count, max: MAX_DICE });
    }

    let complement = kind.complement();
    let good = vec![kind.die(); count];
    let poor = vec![complement.die(); MAX_DICE - count];

    if good.len() + poor.len() != MAX_DICE {
        tracing::error!(%kind, good = good.len(), poor = poor.len(), "Pool half does not add up");
        return Err(DiceError::InvariantViolation {
            kind,
            count: good.len(),
            complement,
            complement_count: poor.len(),
            max: MAX_DICE,
        });
    }

    Ok((good, poor))
}

impl FromStr for Pool {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
