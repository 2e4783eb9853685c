//! Arithmetic spam challenge for public forms.
//!
//! A challenge is a small sum or difference. The question and the expected
//! answer are kept server side under a random hashkey; the form carries
//! only the hashkey (`captcha_0`) and the visitor's answer (`captcha_1`).
//! A hashkey can be checked once.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Minutes a challenge stays answerable
pub const CHALLENGE_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Challenge {
    pub hashkey: Uuid,
    pub challenge: String,
    pub response: String,
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    /// New challenge with operands drawn from a random v4 UUID, which also
    /// serves as the hashkey.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self::from_key(Uuid::new_v4(), now)
    }

    /// Challenge determined by `hashkey`.
    pub fn from_key(hashkey: Uuid, now: DateTime<Utc>) -> Self {
        let bytes = hashkey.as_bytes();
        let a = i32::from(bytes[0] % 20) + 1;
        let b = i32::from(bytes[1] % 9) + 1;

        let (challenge, answer) = if bytes[2] % 2 == 0 {
            (format!("{} + {}", a, b), a + b)
        } else {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            (format!("{} - {}", hi, lo), hi - lo)
        };

        Self {
            hashkey,
            challenge,
            response: answer.to_string(),
            expires_at: now + Duration::minutes(CHALLENGE_TTL_MINUTES),
        }
    }

    /// Whether `answer` solves this challenge at time `now`.
    pub fn accepts(&self, answer: &str, now: DateTime<Utc>) -> bool {
        now <= self.expires_at && answer.trim().eq_ignore_ascii_case(self.response.trim())
    }
}

/// Create, store and return a fresh challenge. Expired challenges are
/// purged on the way.
pub async fn issue_challenge(pool: &PgPool) -> Result<Challenge, sqlx::Error> {
    let now = Utc::now();

    let purged = sqlx::query("DELETE FROM captcha_challenges WHERE expires_at < $1")
        .bind(now)
        .execute(pool)
        .await?
        .rows_affected();
    if purged > 0 {
        tracing::debug!(purged, "Purged expired captcha challenges");
    }

    let challenge = Challenge::generate(now);
    sqlx::query(
        "INSERT INTO captcha_challenges (hashkey, challenge, response, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(challenge.hashkey)
    .bind(&challenge.challenge)
    .bind(&challenge.response)
    .bind(challenge.expires_at)
    .execute(pool)
    .await?;

    Ok(challenge)
}

/// Check an answer against a stored challenge, consuming it.
///
/// Unknown, malformed or expired hashkeys are simply not accepted.
pub async fn verify_challenge(pool: &PgPool, hashkey: &str, answer: &str) -> Result<bool, sqlx::Error> {
    let Ok(hashkey) = Uuid::parse_str(hashkey.trim()) else {
        return Ok(false);
    };

    let stored = sqlx::query_as::<_, Challenge>(
        r#"
        DELETE FROM captcha_challenges
        WHERE hashkey = $1
        RETURNING hashkey, challenge, response, expires_at
        "#,
    )
    .bind(hashkey)
    .fetch_optional(pool)
    .await?;

    Ok(stored.is_some_and(|c| c.accepts(answer, Utc::now())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: [u8; 16]) -> Uuid {
        Uuid::from_bytes(bytes)
    }

    #[test]
    fn test_sum_challenge() {
        let now = Utc::now();
        // a = 4 % 20 + 1 = 5, b = 2 % 9 + 1 = 3, even third byte -> sum
        let c = Challenge::from_key(key([4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), now);
        assert_eq!(c.challenge, "5 + 3");
        assert_eq!(c.response, "8");
    }

    #[test]
    fn test_difference_never_negative() {
        let now = Utc::now();
        // a = 1, b = 9, odd third byte -> difference, operands swapped
        let c = Challenge::from_key(key([0, 8, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), now);
        assert_eq!(c.challenge, "9 - 1");
        assert_eq!(c.response, "8");
    }

    #[test]
    fn test_generated_challenge_answer_is_consistent() {
        let now = Utc::now();
        for _ in 0..50 {
            let c = Challenge::generate(now);
            let parts: Vec<&str> = c.challenge.split(' ').collect();
            let a: i32 = parts[0].parse().unwrap();
            let b: i32 = parts[2].parse().unwrap();
            let expected = if parts[1] == "+" { a + b } else { a - b };
            assert!(expected >= 0);
            assert_eq!(c.response, expected.to_string());
        }
    }

    #[test]
    fn test_accepts_trimmed_answer() {
        let now = Utc::now();
        let c = Challenge::from_key(key([4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), now);
        assert!(c.accepts(" 8 ", now));
        assert!(!c.accepts("9", now));
        assert!(!c.accepts("", now));
    }

    #[test]
    fn test_expired_challenge_rejected() {
        let now = Utc::now();
        let c = Challenge::from_key(key([4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), now);
        let later = now + Duration::minutes(CHALLENGE_TTL_MINUTES + 1);
        assert!(!c.accepts("8", later));
    }
}
