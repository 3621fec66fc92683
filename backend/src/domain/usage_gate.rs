//! Per-client usage gating.
//!
//! Each client address accumulates a daily attempt counter and an
//! `email_provided` flag. The gate decides whether a conversion attempt
//! proceeds, is redirected to the signup form, or is denied for the day.
//!
//! Entries live in a bounded [`DashMap`]; the entry API serialises
//! read-modify-write per key, so concurrent attempts from the same address
//! cannot lose counter updates. When the map reaches capacity, entries from
//! prior calendar days are evicted. Same-day entries are never evicted.

use chrono::NaiveDate;
use dashmap::DashMap;

/// Attempts beyond this count require a captured email for the day.
const SIGNUP_THRESHOLD: u32 = 4;

/// Attempts beyond this count are denied outright for the day.
const DAILY_LIMIT: u32 = 20;

/// Outcome of counting one conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The attempt may proceed to conversion.
    Allow,
    /// The client must submit an email address before continuing.
    RequireSignup,
    /// The client has exhausted its daily quota.
    DenyDailyLimit,
}

/// Daily usage state for one client address.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientUsage {
    date: NaiveDate,
    count: u32,
    email_provided: bool,
}

impl ClientUsage {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            email_provided: false,
        }
    }
}

/// Decides allow / require-signup / deny per client address and day.
pub struct UsageGate {
    entries: DashMap<String, ClientUsage>,
    capacity: usize,
}

impl UsageGate {
    /// Create a gate bounded to `capacity` tracked addresses.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Count one attempt for `addr` and return the gating decision.
    ///
    /// Every POST-style conversion attempt is counted, including ones that
    /// end up redirected or denied. An entry carrying a different date is
    /// reset before the attempt is counted. Threshold comparisons are
    /// strict: the 5th attempt of a day without a captured email is the
    /// first to require signup, and the 21st is the first to be denied.
    pub fn register_attempt(&self, addr: &str, today: NaiveDate) -> Decision {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(addr) {
            self.evict_stale(today);
        }

        let mut entry = self
            .entries
            .entry(addr.to_owned())
            .or_insert_with(|| ClientUsage::fresh(today));
        if entry.date != today {
            *entry = ClientUsage::fresh(today);
        }
        entry.count += 1;

        if entry.count > SIGNUP_THRESHOLD && !entry.email_provided {
            return Decision::RequireSignup;
        }
        if entry.count > DAILY_LIMIT {
            return Decision::DenyDailyLimit;
        }
        Decision::Allow
    }

    /// Mark `addr` as having provided an email for the current day.
    ///
    /// Creates the entry if absent. An existing entry keeps its counter and
    /// date untouched; only the flag flips. Idempotent. This is the only
    /// way the flag becomes true within a day; the daily reset in
    /// [`Self::register_attempt`] is the only way it becomes false again.
    pub fn mark_email_provided(&self, addr: &str, today: NaiveDate) {
        let mut entry = self
            .entries
            .entry(addr.to_owned())
            .or_insert_with(|| ClientUsage::fresh(today));
        entry.email_provided = true;
    }

    /// Number of tracked addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no addresses are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose date is not `today`.
    fn evict_stale(&self, today: NaiveDate) {
        self.entries.retain(|_, usage| usage.date == today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).expect("valid date")
    }

    #[rstest]
    fn first_four_attempts_allow() {
        let gate = UsageGate::new(16);
        for attempt in 1..=4 {
            assert_eq!(
                gate.register_attempt("10.0.0.1", day(1)),
                Decision::Allow,
                "attempt {attempt} should be allowed"
            );
        }
    }

    #[rstest]
    fn fifth_attempt_requires_signup() {
        let gate = UsageGate::new(16);
        for _ in 0..4 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::RequireSignup
        );
    }

    #[rstest]
    fn attempts_after_signup_allow_until_daily_limit() {
        let gate = UsageGate::new(16);
        for _ in 0..4 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        gate.mark_email_provided("10.0.0.1", day(1));

        for attempt in 5..=20 {
            assert_eq!(
                gate.register_attempt("10.0.0.1", day(1)),
                Decision::Allow,
                "attempt {attempt} after signup should be allowed"
            );
        }
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::DenyDailyLimit,
            "attempt 21 should be denied"
        );
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::DenyDailyLimit,
            "denial persists past the limit"
        );
    }

    #[rstest]
    fn without_signup_the_gate_keeps_redirecting() {
        // The signup check runs before the daily-limit check, so an address
        // that never provides an email sees RequireSignup even past 20.
        let gate = UsageGate::new(16);
        for _ in 0..25 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::RequireSignup
        );
    }

    #[rstest]
    fn new_day_resets_count_and_flag() {
        let gate = UsageGate::new(16);
        for _ in 0..10 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        gate.mark_email_provided("10.0.0.1", day(1));

        // First touch on the next day starts over: counted as attempt 1.
        assert_eq!(gate.register_attempt("10.0.0.1", day(2)), Decision::Allow);
        for _ in 0..3 {
            assert_eq!(gate.register_attempt("10.0.0.1", day(2)), Decision::Allow);
        }
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(2)),
            Decision::RequireSignup,
            "yesterday's signup does not carry over"
        );
    }

    #[rstest]
    fn mark_email_provided_is_idempotent_and_keeps_count() {
        let gate = UsageGate::new(16);
        for _ in 0..6 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        gate.mark_email_provided("10.0.0.1", day(1));
        gate.mark_email_provided("10.0.0.1", day(1));

        // Counter continues from 6, not from 0.
        for attempt in 7..=20 {
            assert_eq!(
                gate.register_attempt("10.0.0.1", day(1)),
                Decision::Allow,
                "attempt {attempt} should be allowed"
            );
        }
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::DenyDailyLimit
        );
    }

    #[rstest]
    fn mark_email_provided_creates_absent_entry() {
        let gate = UsageGate::new(16);
        gate.mark_email_provided("10.0.0.9", day(1));

        for attempt in 1..=20 {
            assert_eq!(
                gate.register_attempt("10.0.0.9", day(1)),
                Decision::Allow,
                "attempt {attempt} should be allowed"
            );
        }
        assert_eq!(
            gate.register_attempt("10.0.0.9", day(1)),
            Decision::DenyDailyLimit
        );
    }

    #[rstest]
    fn addresses_are_tracked_independently() {
        let gate = UsageGate::new(16);
        for _ in 0..5 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        assert_eq!(gate.register_attempt("10.0.0.2", day(1)), Decision::Allow);
    }

    #[rstest]
    fn prior_day_entries_are_evicted_at_capacity() {
        let gate = UsageGate::new(2);
        gate.register_attempt("10.0.0.1", day(1));
        gate.register_attempt("10.0.0.2", day(1));
        assert_eq!(gate.len(), 2);

        // The map is full; admitting a new address on day 2 sweeps the
        // stale day-1 entries first.
        gate.register_attempt("10.0.0.3", day(2));
        assert_eq!(gate.len(), 1);
    }

    #[rstest]
    fn same_day_entries_survive_capacity_sweep() {
        let gate = UsageGate::new(2);
        for _ in 0..5 {
            gate.register_attempt("10.0.0.1", day(1));
        }
        gate.register_attempt("10.0.0.2", day(1));
        gate.register_attempt("10.0.0.3", day(1));

        // The sweep found nothing stale; existing counters are intact.
        assert_eq!(
            gate.register_attempt("10.0.0.1", day(1)),
            Decision::RequireSignup
        );
        assert_eq!(gate.len(), 3);
    }
}
