use std::str::FromStr;

use itertools::Itertools;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Statistics with a leader table on the page.
///
/// Variants are declared in alphabetical order of their labels,
/// which is also the order of the interactive menu.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumString, IntoStaticStr)]
pub enum Statistic {
    #[strum(serialize = "3 point percentage")]
    ThreePointPercentage,
    #[strum(serialize = "assists per game")]
    AssistsPerGame,
    #[strum(serialize = "blocks per game")]
    BlocksPerGame,
    #[strum(serialize = "field goal percentage")]
    FieldGoalPercentage,
    #[strum(serialize = "free throw percentage")]
    FreeThrowPercentage,
    #[strum(serialize = "points per game")]
    PointsPerGame,
    #[strum(serialize = "rebounds per game")]
    ReboundsPerGame,
    #[strum(serialize = "steals per game")]
    StealsPerGame,
    #[strum(serialize = "turnovers per game")]
    TurnoversPerGame,
}

impl Statistic {
    /// Lowercase label, e.g. `points per game`.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// The `id` of the `div` that wraps this statistic's table.
    pub fn table_id(self) -> &'static str {
        use Statistic::*;
        match self {
            PointsPerGame => "leaders_pts_per_g",
            ReboundsPerGame => "leaders_trb_per_g",
            AssistsPerGame => "leaders_ast_per_g",
            StealsPerGame => "leaders_stl_per_g",
            BlocksPerGame => "leaders_blk_per_g",
            TurnoversPerGame => "leaders_tov_per_g",
            FieldGoalPercentage => "leaders_fg_pct",
            ThreePointPercentage => "leaders_fg3_pct",
            FreeThrowPercentage => "leaders_ft_pct",
        }
    }

    pub fn is_percentage(self) -> bool {
        use Statistic::*;
        matches!(
            self,
            FieldGoalPercentage | ThreePointPercentage | FreeThrowPercentage
        )
    }

    /// Title-cased label used as the column header, e.g. `Points Per Game`.
    pub fn display_name(self) -> String {
        self.label()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .join(" ")
    }

    /// File name stem, e.g. `points_per_game`.
    pub fn slug(self) -> String {
        self.label().replace(' ', "_")
    }

    pub fn menu() -> impl Iterator<Item = (usize, Statistic)> {
        (1..).zip(Self::iter())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Selection {
    Statistic(Statistic),
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSelection {
    #[error("Invalid choice. Please enter a number between 1 and {max}.")]
    OutOfRange { max: usize },
    #[error("Invalid choice. Please select from the available statistics.")]
    Unknown(String),
}

impl FromStr for Selection {
    type Err = InvalidSelection;

    /// Accepts a 1-based menu index, an exact label (case-insensitive), `quit` or `exit`.
    fn from_str(s: &str) -> Result<Self, InvalidSelection> {
        let choice = s.trim().to_lowercase();
        if matches!(choice.as_str(), "quit" | "exit") {
            return Ok(Self::Quit);
        }
        if !choice.is_empty() && choice.bytes().all(|b| b.is_ascii_digit()) {
            let max = Statistic::iter().len();
            return choice
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| Statistic::iter().nth(i))
                .map(Self::Statistic)
                .ok_or(InvalidSelection::OutOfRange { max });
        }
        Statistic::from_str(&choice)
            .map(Self::Statistic)
            .map_err(|_| InvalidSelection::Unknown(choice))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use strum::IntoEnumIterator;

    use super::{InvalidSelection, Selection, Statistic};

    #[test]
    fn menu_is_sorted_by_label() {
        let labels = Statistic::iter().map(Statistic::label).collect_vec();
        assert_eq!(labels.len(), 9);
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
        assert_eq!(
            Statistic::menu().next(),
            Some((1, Statistic::ThreePointPercentage))
        );
    }

    #[test]
    fn table_ids_are_distinct() {
        let ids = Statistic::iter().map(Statistic::table_id).collect_vec();
        assert!(ids.iter().all_unique());
        assert!(ids.iter().all(|id| id.starts_with("leaders_")));
        assert_eq!(Statistic::PointsPerGame.table_id(), "leaders_pts_per_g");
        assert_eq!(Statistic::ThreePointPercentage.table_id(), "leaders_fg3_pct");
    }

    #[test]
    fn display_name_and_slug() {
        assert_eq!(Statistic::PointsPerGame.display_name(), "Points Per Game");
        assert_eq!(
            Statistic::ThreePointPercentage.display_name(),
            "3 Point Percentage"
        );
        assert_eq!(Statistic::FieldGoalPercentage.slug(), "field_goal_percentage");
        assert_eq!(Statistic::ThreePointPercentage.slug(), "3_point_percentage");
    }

    #[test]
    fn percentages() {
        let pct = Statistic::iter().filter(|s| s.is_percentage()).collect_vec();
        assert_eq!(
            pct,
            [
                Statistic::ThreePointPercentage,
                Statistic::FieldGoalPercentage,
                Statistic::FreeThrowPercentage
            ]
        );
    }

    #[test]
    fn parse_selection() {
        let stat = |s| Ok::<_, InvalidSelection>(Selection::Statistic(s));
        assert_eq!("1".parse::<Selection>(), stat(Statistic::ThreePointPercentage));
        assert_eq!(" 6 ".parse::<Selection>(), stat(Statistic::PointsPerGame));
        assert_eq!("9".parse::<Selection>(), stat(Statistic::TurnoversPerGame));
        assert_eq!("Points Per Game".parse::<Selection>(), stat(Statistic::PointsPerGame));
        assert_eq!("quit".parse::<Selection>(), Ok(Selection::Quit));
        assert_eq!("EXIT".parse::<Selection>(), Ok(Selection::Quit));
        for input in ["0", "10", "99999999999999999999999"] {
            assert_eq!(
                input.parse::<Selection>(),
                Err(InvalidSelection::OutOfRange { max: 9 }),
                "{input}"
            );
        }
        assert_eq!(
            "points".parse::<Selection>(),
            Err(InvalidSelection::Unknown("points".to_owned()))
        );
        assert_eq!(
            "".parse::<Selection>(),
            Err(InvalidSelection::Unknown(String::new()))
        );
    }
}
