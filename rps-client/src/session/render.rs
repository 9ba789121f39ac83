//! Text Rendering
//!
//! Everything the player sees, as plain strings. No I/O.

use solana_program::pubkey::Pubkey;

use crate::game::leaderboard::Leaderboard;
use crate::game::moves::{Move, Outcome};
use crate::game::reconcile::TurnResult;
use crate::game::records::{GlobalState, PlayerName, PlayerRecord};

/// Medals for the first three places; the rest get padding.
const MEDALS: [&str; 3] = ["👑", "🥈", "🥉"];

/// Achievement thresholds on `highest_streak`.
const STREAK_ACHIEVEMENTS: [u64; 3] = [3, 5, 10];

/// Games needed for the veteran badge.
const VETERAN_GAMES: u64 = 10;

/// Games needed for the master badge.
const MASTER_GAMES: u64 = 50;

/// `abcd...wxyz` form of an address.
pub fn short_address(address: &Pubkey) -> String {
    let full = address.to_string();
    if full.len() <= 8 {
        return full;
    }
    format!("{}...{}", &full[..4], &full[full.len() - 4..])
}

/// Percentage with one decimal.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn display_name(name: &PlayerName) -> String {
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

fn medal(rank: usize) -> &'static str {
    MEDALS.get(rank).copied().unwrap_or("  ")
}

fn move_label(m: Move) -> &'static str {
    match m {
        Move::Rock => "👊 Rock 👊",
        Move::Paper => "✋ Paper ✋",
        Move::Scissors => "✌️  Scissors ✌️",
    }
}

/// Move menu shown before each turn.
pub fn move_menu() -> String {
    [
        "",
        "        💥 ROCK PAPER SCISSORS 💥",
        "",
        "  👊 1           ✋ 2            ✌️  3",
        "  Rock           Paper         Scissors",
    ]
    .join("\n")
}

/// Post-turn choices.
pub fn post_turn_menu() -> String {
    [
        "",
        "New Game?      💥 Yes - press return or  👊  1   ✋  2   ✌️  3",
        "               📊 Stats - press s",
        "               ❌ Quit - press q",
    ]
    .join("\n")
}

/// Greeting for a player without a record.
pub fn welcome_new(player: &Pubkey, record_address: &Pubkey) -> String {
    format!(
        "\nWelcome, new player!\nYour wallet: {}\nAccount: {}",
        player, record_address
    )
}

/// Summary for a returning player.
pub fn welcome_back(player: &Pubkey, record_address: &Pubkey, record: &PlayerRecord) -> String {
    [
        format!("\nWelcome back, {}!", display_name(&record.name)),
        format!("Wallet: {}", player),
        format!("Account: {}", record_address),
        format!("Games played so far: {}", record.games_played),
        format!("Games won: {}", record.games_won),
        format!("Win rate: {}", format_percent(record.win_rate_percent())),
        format!("Current streak: {}", record.current_streak),
    ]
    .join("\n")
}

/// Streak counter line with one 💥 per consecutive win.
pub fn streak_counter(streak: u64) -> String {
    format!("Match counter: {} {}", streak, "💥".repeat(streak as usize))
}

fn outcome_banner(outcome: Outcome, player_move: Move) -> String {
    let hand = match player_move {
        Move::Rock => "👊 🗿 ",
        Move::Paper => "✋ 🧻 ",
        Move::Scissors => "✌️  ✂️  ",
    };
    match outcome {
        Outcome::Win => format!("You win! 🎉 {}{}", "🎉 🎊 🎈 ✨ 💫 ⭐ 🔥 ".repeat(2), hand.repeat(6)),
        Outcome::Lose => format!("You lose! 😭 {}{}", "😵 💔 😭 😰 😱 💀 ☠️  ".repeat(2), hand.repeat(6)),
        Outcome::Tie => format!("It's a tie! {}", "🤝 ".repeat(25)),
    }
}

/// Turn result frame.
pub fn turn_result(turn: &TurnResult, streak: u64) -> String {
    [
        "\n🎯 ======== GAME RESULTS ======== 🎯".to_string(),
        format!("\nYour move:     {}", move_label(turn.player_move)),
        format!("\nMachine move:  {}\n", move_label(turn.machine_move)),
        format!("               {}", outcome_banner(turn.outcome, turn.player_move)),
        format!("\n{}", streak_counter(streak)),
        format!("Transaction:   {}", turn.signature),
        "\n🎯 ================================ 🎯".to_string(),
    ]
    .join("\n")
}

/// Achievements earned by a record, in display order.
pub fn achievements(record: &PlayerRecord) -> Vec<String> {
    let mut earned: Vec<String> = STREAK_ACHIEVEMENTS
        .iter()
        .filter(|&&n| record.highest_streak >= n)
        .map(|n| format!("{}-win streak", n))
        .collect();
    if record.games_played >= VETERAN_GAMES {
        earned.push(format!("Veteran ({}+ games)", VETERAN_GAMES));
    }
    if record.games_played >= MASTER_GAMES {
        earned.push(format!("Master ({}+ games)", MASTER_GAMES));
    }
    earned
}

/// Global counters block.
pub fn global_stats(state: &GlobalState) -> String {
    [
        format!("Total games played: {} 🎮", state.total_games),
        format!("Total wins: {} 🏅", state.total_wins),
        format!("Total players: {} 👥", state.total_players),
        format!("Global win rate: {} 📈", format_percent(state.win_rate_percent())),
    ]
    .join("\n")
}

/// One player's counters.
pub fn player_stats(record: &PlayerRecord) -> String {
    let name = if record.name.is_empty() {
        "(not set)".to_string()
    } else {
        record.name.to_string()
    };

    [
        format!("Name: {}", name),
        format!("Games played: {} 🎮", record.games_played),
        format!("Games won: {} 🏅", record.games_won),
        format!("Current streak: {} ⭐", record.current_streak),
        format!("Highest streak: {} 🔥", record.highest_streak),
        format!("Win rate: {} 📈", format_percent(record.win_rate_percent())),
    ]
    .join("\n")
}

/// One titled board, or `None` when it has no entries.
fn board<F>(title: &str, records: &[PlayerRecord], line: F) -> Option<String>
where
    F: Fn(&PlayerRecord) -> String,
{
    if records.is_empty() {
        return None;
    }
    let rows = records.iter().enumerate().map(|(rank, record)| {
        format!(
            "{} {} - {} - {}",
            medal(rank),
            short_address(&record.player_key()),
            line(record),
            display_name(&record.name),
        )
    });
    let lines: Vec<String> = std::iter::once(format!("\n{}", title)).chain(rows).collect();
    Some(lines.join("\n"))
}

/// The three leaderboards.
pub fn leaderboard(boards: &Leaderboard) -> String {
    let mut sections = vec![
        "\nLeaderboard:".to_string(),
        format!("Active players: {}", boards.active_players),
    ];

    if boards.is_empty() {
        sections.push("No players yet.".to_string());
        return sections.join("\n");
    }

    sections.extend(board("🥇 Top 5 by Games Won:", &boards.top_by_wins, |r| {
        format!("{} wins - {} games", r.games_won, r.games_played)
    }));
    sections.extend(board("📈 Top 5 by Win Rate (min 5 games):", &boards.top_by_win_rate, |r| {
        format!("{} - {}/{}", format_percent(r.win_rate_percent()), r.games_won, r.games_played)
    }));
    sections.extend(board("🔥 Fire Streaks 🔥:", &boards.top_by_highest_streak, |r| {
        format!("{} streaks 🔥", r.highest_streak)
    }));
    sections.join("\n")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::leaderboard::aggregate;
    use crate::game::reconcile::ResultSource;

    fn record(played: u64, won: u64, highest: u64) -> PlayerRecord {
        PlayerRecord {
            player: [7; 32],
            name: PlayerName::parse("neo").unwrap(),
            games_played: played,
            games_won: won,
            current_streak: 0,
            highest_streak: highest,
            bump: 254,
        }
    }

    #[test]
    fn test_short_address() {
        let address = Pubkey::new_from_array([7; 32]);
        let full = address.to_string();
        let short = short_address(&address);
        assert_eq!(short.len(), 11);
        assert!(short.starts_with(&full[..4]));
        assert!(short.ends_with(&full[full.len() - 4..]));
    }

    #[test]
    fn test_streak_counter() {
        assert_eq!(streak_counter(0), "Match counter: 0 ");
        assert_eq!(streak_counter(3), "Match counter: 3 💥💥💥");
    }

    #[test]
    fn test_percent_one_decimal() {
        assert_eq!(format_percent(record(3, 2, 0).win_rate_percent()), "66.7%");
        assert_eq!(format_percent(record(0, 0, 0).win_rate_percent()), "0.0%");
    }

    #[test]
    fn test_achievements() {
        assert!(achievements(&record(2, 2, 2)).is_empty());
        assert_eq!(
            achievements(&record(12, 8, 5)),
            vec!["3-win streak", "5-win streak", "Veteran (10+ games)"]
        );
        assert_eq!(achievements(&record(60, 30, 10)).len(), 5);
    }

    #[test]
    fn test_turn_result_frame() {
        let turn = TurnResult {
            player_move: Move::Rock,
            machine_move: Move::Scissors,
            outcome: Outcome::Win,
            source: ResultSource::Ledger,
            signature: "abc".into(),
            record: None,
        };
        let text = turn_result(&turn, 2);
        assert!(text.contains("You win!"));
        assert!(text.contains("Machine move:  ✌️  Scissors"));
        assert!(text.contains("Match counter: 2 💥💥"));
        assert!(text.contains("Transaction:   abc"));
    }

    #[test]
    fn test_leaderboard_unknown_name_and_medals() {
        let mut nameless = record(6, 6, 6);
        nameless.name = PlayerName::default();
        let text = leaderboard(&aggregate(&[nameless]));
        assert!(text.contains("👑"));
        assert!(text.contains("Unknown"));
        assert!(text.contains("100.0% - 6/6"));
        assert!(text.contains("6 streaks"));
    }

    #[test]
    fn test_empty_leaderboard() {
        let text = leaderboard(&aggregate(&[]));
        assert!(text.contains("No players yet."));
    }
}
