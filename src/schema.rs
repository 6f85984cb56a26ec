use std::fmt::Display;

use arrayvec::ArrayVec;
use getset::Getters;
use typed_builder::TypedBuilder;

/// Number of data rows taken from a leader table.
pub const MAX_LEADERS: usize = 15;

#[derive(
    Clone, Default, PartialEq, Eq, Debug, derive_more::From, derive_more::Display,
)]
pub struct PlayerName(String);
impl PlayerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short team abbreviation such as `PHO`.  Empty when the page does not show one.
#[derive(
    Clone, Default, PartialEq, Eq, Debug, derive_more::From, derive_more::Display,
)]
pub struct TeamCode(String);
impl TeamCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum StatValue {
    Number(f64),
    /// Cell text kept verbatim when numeric coercion is turned off.
    Text(String),
}
impl StatValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Text(_) => None,
        }
    }
}
impl Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // `30.0`, not `30`
            Self::Number(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Getters, TypedBuilder)]
#[getset(get = "pub")]
pub struct LeaderRecord {
    #[builder(setter(into))]
    name: PlayerName,
    #[builder(default, setter(into))]
    affiliation: TeamCode,
    #[builder(default)]
    value: Option<StatValue>,
}

/// The top rows of a leader table, in page order.
#[derive(Clone, Default, PartialEq, Debug, derive_more::Deref)]
pub struct LeaderSet(ArrayVec<LeaderRecord, MAX_LEADERS>);
impl LeaderSet {
    pub(crate) fn new(records: ArrayVec<LeaderRecord, MAX_LEADERS>) -> Self {
        Self(records)
    }
}
impl TryFrom<Vec<LeaderRecord>> for LeaderSet {
    type Error = usize;

    /// Fails with the offending length if there are more than [`MAX_LEADERS`] records.
    fn try_from(records: Vec<LeaderRecord>) -> Result<Self, usize> {
        let len = records.len();
        if len > MAX_LEADERS {
            return Err(len);
        }
        Ok(Self(records.into_iter().collect()))
    }
}
