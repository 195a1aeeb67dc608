//! One-line battle summaries for a viewing player.
//!
//! Text collaborators (player names, translation, number formatting) only
//! shape the sentence; they never influence a battle.

use std::borrow::Cow;

use crate::score::ScoreRange;

/// Player name lookup.
pub trait PlayerNames {
    /// Adjective form of a player's name ("Fed", "Lizard").
    fn adjective(&self, player: u8) -> String;
}

/// Names every player "Player N".
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedPlayers;

impl PlayerNames for NumberedPlayers {
    fn adjective(&self, player: u8) -> String {
        format!("Player {player}")
    }
}

/// User-interface text translation.
pub trait Translator {
    /// Translate a template; unknown text is returned unchanged.
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Leaves every text untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Number formatting for user-visible text.
pub trait NumberFormatter {
    /// Format one integer.
    fn format_number(&self, value: i32) -> String;

    /// Format a range as `min` or `min-max`.
    fn format_range(&self, range: ScoreRange) -> String {
        if range.is_exact() {
            self.format_number(range.min)
        } else {
            format!(
                "{}-{}",
                self.format_number(range.min),
                self.format_number(range.max)
            )
        }
    }
}

/// Formats numbers with `,` thousands separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupedNumbers;

impl NumberFormatter for GroupedNumbers {
    fn format_number(&self, value: i32) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

/// Result class of a battle as seen by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    /// Enemy lost a unit, by destruction; we lost nothing.
    WonDestroyed,
    /// Enemy lost a unit to our capture; we lost nothing.
    WonCaptured,
    /// We lost a unit, by destruction; the enemy lost nothing.
    LostDestroyed,
    /// We lost a unit to capture; the enemy lost nothing.
    LostCaptured,
    /// Both sides lost units.
    MutualLosses,
    /// Nobody lost anything.
    NoLosses,
    /// The viewing player had no unit in the battle.
    NotInvolved,
}

/// Sentence template for every summary class.
pub const SUMMARY_TEMPLATES: [(SummaryKind, &str); 7] = [
    (SummaryKind::WonDestroyed, "We won this fight, destroying the enemy."),
    (SummaryKind::WonCaptured, "We won this fight, capturing the enemy."),
    (SummaryKind::LostDestroyed, "We lost this fight; our unit was destroyed."),
    (SummaryKind::LostCaptured, "We lost this fight; our unit was captured."),
    (SummaryKind::MutualLosses, "Both sides suffered losses in this fight."),
    (SummaryKind::NoLosses, "This fight ended without losses."),
    (SummaryKind::NotInvolved, "%s units fought without us."),
];

/// Template announcing a score.
pub const SCORE_TEMPLATE: &str = "We earned %s build points.";

/// Template text for a summary class.
#[must_use]
pub fn template(kind: SummaryKind) -> &'static str {
    SUMMARY_TEMPLATES
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or("", |(_, text)| text)
}

/// One unit's part in the summary: owner before the battle and its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Owner before the battle.
    pub owner: u8,
    /// Outcome code.
    pub outcome: i32,
}

/// Classify a battle from the viewpoint of `viewpoint`.
#[must_use]
pub fn classify(viewpoint: u8, units: &[UnitOutcome]) -> SummaryKind {
    if !units.iter().any(|u| u.owner == viewpoint) {
        return SummaryKind::NotInvolved;
    }

    let ours = units.iter().filter(|u| u.owner == viewpoint);
    let theirs = units.iter().filter(|u| u.owner != viewpoint);

    let we_lost_destroyed = ours.clone().any(|u| u.outcome < 0);
    let we_lost_captured = ours.clone().any(|u| u.outcome > 0 && u.outcome != i32::from(viewpoint));
    let they_lost_destroyed = theirs.clone().any(|u| u.outcome < 0);
    let they_lost_captured = theirs.clone().any(|u| u.outcome > 0 && u.outcome != i32::from(u.owner));

    let we_lost = we_lost_destroyed || we_lost_captured;
    let they_lost = they_lost_destroyed || they_lost_captured;
    match (we_lost, they_lost) {
        (true, true) => SummaryKind::MutualLosses,
        (false, false) => SummaryKind::NoLosses,
        (false, true) if they_lost_destroyed => SummaryKind::WonDestroyed,
        (false, true) => SummaryKind::WonCaptured,
        (true, false) if we_lost_destroyed => SummaryKind::LostDestroyed,
        (true, false) => SummaryKind::LostCaptured,
    }
}

/// Render the summary sentence.
///
/// `owners` lists the participating players for the "not involved" case;
/// `score` appends the score suffix when present.
#[must_use]
pub fn render(
    kind: SummaryKind,
    owners: &[u8],
    score: Option<ScoreRange>,
    names: &dyn PlayerNames,
    tx: &dyn Translator,
    fmt: &dyn NumberFormatter,
) -> String {
    let mut text = tx.translate(template(kind)).into_owned();
    if kind == SummaryKind::NotInvolved {
        let list = owners
            .iter()
            .map(|&p| names.adjective(p))
            .collect::<Vec<_>>()
            .join(" and ");
        text = text.replacen("%s", &list, 1);
    }
    if let Some(score) = score {
        let points = ScoreRange::new(score.min / 1000, score.max / 1000);
        let suffix = tx.translate(SCORE_TEMPLATE).replacen("%s", &fmt.format_range(points), 1);
        text.push(' ');
        text.push_str(&suffix);
    }
    text
}
