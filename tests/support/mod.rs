pub mod socket_guard;

/// Ladder `stats` object with every field the extractor requires.
#[allow(dead_code)]
#[must_use]
pub fn ladder_stats(points: i64) -> serde_json::Value {
    serde_json::json!({
        "played": 5, "wins": 4, "drawn": 0, "lost": 1, "byes": 0,
        "points for": 120, "points against": 80, "points difference": 40,
        "home record": "2-0", "away record": "2-1",
        "points": points, "bonus points": 0,
        "streak": "3W", "form": "WWWLW",
        "average losing margin": 4, "average winning margin": 12,
        "golden point": 0, "day record": "1-0", "night record": "3-1",
        "players used": 20, "odds": "$2.10"
    })
}
