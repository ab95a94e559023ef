use serenity::all::{CreateEmbed, CreateEmbedFooter};

use crate::levels;
use crate::storage::GuildStats;

pub const BAR_WIDTH: usize = 15;

const EMBED_COLOUR: u32 = 0x3498DB;

/* How far into the current level the guild is, as a fraction of the bracket. */
fn progress_fraction(stats: &GuildStats) -> f64 {
    let start = levels::threshold(stats.level);
    let end = levels::threshold(stats.level + 1);

    (stats.current_exp.saturating_sub(start) as f64 / (end - start) as f64).clamp(0.0, 1.0)
}

fn filled_segments(fraction: f64) -> usize {
    (fraction * BAR_WIDTH as f64) as usize
}

fn progress_bar(filled: usize) -> String {
    format!("{}{}", "🟦".repeat(filled), "⬜".repeat(BAR_WIDTH - filled))
}

/* Only shown while there is a next level to work towards. */
fn footer_text(stats: &GuildStats) -> Option<String> {
    if stats.level >= levels::MAX_LEVEL {
        return None;
    }

    let next = levels::threshold(stats.level + 1);
    Some(format!(
        "Points to Level {}: {} EXP",
        stats.level + 1,
        group_digits(next.saturating_sub(stats.current_exp))
    ))
}

pub fn render(stats: &GuildStats, guild_name: &str) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(format!("📊 Server Progress: {guild_name}"))
        .colour(EMBED_COLOUR);

    if stats.level >= levels::MAX_LEVEL {
        embed
            .field(
                format!("Level {} (MAX)", stats.level),
                format!("{} **100%**", progress_bar(BAR_WIDTH)),
                false,
            )
            .field(
                "Total Experience",
                format!("💎 `{}`", group_digits(stats.current_exp)),
                true,
            )
    } else {
        let fraction = progress_fraction(stats);
        let embed = embed
            .field(
                format!("Current Level: {}", stats.level),
                format!(
                    "{} **{}%**",
                    progress_bar(filled_segments(fraction)),
                    (fraction * 100.0) as u32
                ),
                false,
            )
            .field(
                "Experience",
                format!(
                    "✨ `{}` / `{}`",
                    group_digits(stats.current_exp),
                    group_digits(levels::threshold(stats.level + 1))
                ),
                true,
            );

        match footer_text(stats) {
            Some(text) => embed.footer(CreateEmbedFooter::new(text)),
            None => embed,
        }
    }
}

pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

pub fn group_signed(value: i64) -> String {
    if value < 0 {
        format!("-{}", group_digits(value.unsigned_abs()))
    } else {
        group_digits(value as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(level: u32, current_exp: u64) -> GuildStats {
        GuildStats {
            level,
            current_exp,
            ..GuildStats::default()
        }
    }

    #[test]
    fn fraction_spans_the_level_bracket() {
        assert_eq!(progress_fraction(&stats(1, 100)), 0.0);
        assert_eq!(progress_fraction(&stats(0, 50)), 0.5);
        assert_eq!(progress_fraction(&stats(1, 300)), 0.5);
    }

    #[test]
    fn fraction_is_clamped_against_inconsistent_stats() {
        assert_eq!(progress_fraction(&stats(1, 10_000)), 1.0);
        assert_eq!(progress_fraction(&stats(1, 0)), 0.0);
    }

    #[test]
    fn segments_are_floored() {
        assert_eq!(filled_segments(0.0), 0);
        assert_eq!(filled_segments(0.5), 7);
        assert_eq!(filled_segments(0.99), 14);
        assert_eq!(filled_segments(1.0), BAR_WIDTH);
    }

    #[test]
    fn bar_always_has_full_width() {
        for filled in 0..=BAR_WIDTH {
            assert_eq!(progress_bar(filled).chars().count(), BAR_WIDTH);
        }
    }

    #[test]
    fn footer_counts_down_to_the_next_level() {
        assert_eq!(
            footer_text(&stats(0, 40)),
            Some("Points to Level 1: 60 EXP".to_string())
        );
        assert_eq!(
            footer_text(&stats(11, 60_000)),
            Some("Points to Level 12: 500 EXP".to_string())
        );
        /* Floored at zero even if the stats got ahead of the level. */
        assert_eq!(
            footer_text(&stats(11, 70_000)),
            Some("Points to Level 12: 0 EXP".to_string())
        );
    }

    #[test]
    fn max_level_has_no_footer() {
        assert_eq!(footer_text(&stats(12, 60_500)), None);
        assert_eq!(footer_text(&stats(12, 1_000_000)), None);
    }

    #[test]
    fn digits_are_grouped_by_thousands() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(60_500), "60,500");
        assert_eq!(group_digits(1_234_567), "1,234,567");
        assert_eq!(group_signed(-1_000), "-1,000");
        assert_eq!(group_signed(i64::MIN), "-9,223,372,036,854,775,808");
    }
}
