use std::fmt;

use super::types::{DieResult, Results};

/// Render results as the two-block summary posted back to the channel.
pub fn render(results: &Results) -> String {
    results.to_string()
}

fn listing(rolls: &[DieResult]) -> String {
    rolls
        .iter()
        .map(|r| format!("{} {}", r.value, r.die.kind.marker()))
        .collect::<Vec<_>>()
        .join("   ")
}

impl fmt::Display for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**Skill Successes:** **{}**", self.skill_successes())?;
        writeln!(f, "{}", listing(&self.skill))?;
        writeln!(f, "**Luck Successes:** **{}**", self.luck_successes())?;
        write!(f, "{}", listing(&self.luck))
    }
}
