use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One body-weight entry per user per calendar day.
///
/// `id` is the local surrogate key; the merge key is (user_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLog {
    pub id: Option<i64>,
    pub user_id: String,
    pub date: NaiveDate,
    pub weight: f64,
}

impl WeightLog {
    pub fn new(user_id: impl Into<String>, date: NaiveDate, weight: f64) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            date,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_surrogate_key() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let log = WeightLog::new("user1", date, 71.4);

        assert_eq!(log.id, None);
        assert_eq!(log.date, date);
        assert_eq!(log.weight, 71.4);
    }
}
