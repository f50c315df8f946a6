use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Phrases the hat mutters before announcing the result. Starts at a random
/// phrase and moves to the next one on every tick.
#[derive(Debug, Clone)]
pub struct ThinkingPhrases {
    phrases: Vec<String>,
    start: usize,
}

impl ThinkingPhrases {
    pub fn new<R: Rng + ?Sized>(phrases: Vec<String>, rng: &mut R) -> Self {
        let start = if phrases.len() > 1 {
            rng.gen_range(0..phrases.len())
        } else {
            0
        };
        Self { phrases, start }
    }

    pub fn at(&self, tick: usize) -> &str {
        if self.phrases.is_empty() {
            return "";
        }
        &self.phrases[(self.start + tick) % self.phrases.len()]
    }
}

/// Number of phrase changes shown before the result is revealed.
pub fn ticks_before_reveal(phrase_change: Duration, reveal_delay: Duration) -> usize {
    if phrase_change.is_zero() {
        return 0;
    }
    let ticks = reveal_delay.as_millis() / phrase_change.as_millis();
    // The last change would land on the reveal itself
    if reveal_delay.as_millis() % phrase_change.as_millis() == 0 {
        ticks.saturating_sub(1) as usize
    } else {
        ticks as usize
    }
}

/// Pending reveal tasks, at most one per chat. Replacing or cancelling a
/// task aborts it, so a restarted chat never receives a stale result.
#[derive(Debug)]
pub struct RevealTasks<K> {
    tasks: Arc<Mutex<HashMap<K, JoinHandle<()>>>>,
}

impl<K> Clone for RevealTasks<K> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
        }
    }
}

impl<K> Default for RevealTasks<K> {
    fn default() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash> RevealTasks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn schedule(&self, key: K, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = tasks.insert(key, task) {
            previous.abort();
        }
    }

    /// Aborts the pending reveal for `key`. Returns whether one was still running.
    pub async fn cancel(&self, key: &K) -> bool {
        match self.tasks.lock().await.remove(key) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub async fn is_pending(&self, key: &K) -> bool {
        self.tasks
            .lock()
            .await
            .get(key)
            .map_or(false, |handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn phrases() -> Vec<String> {
        vec!["раз".to_string(), "два".to_string(), "три".to_string()]
    }

    #[test]
    fn phrases_rotate_from_a_random_start() {
        let thinking = ThinkingPhrases::new(phrases(), &mut StdRng::seed_from_u64(4));
        let first = thinking.at(0).to_string();
        let start = phrases().iter().position(|p| *p == first).unwrap();

        for tick in 0..7 {
            assert_eq!(thinking.at(tick), phrases()[(start + tick) % 3]);
        }
    }

    #[test]
    fn single_phrase_does_not_need_randomness() {
        let thinking = ThinkingPhrases::new(
            vec!["Хм".to_string()],
            &mut crate::quiz::resolver::tests::NoRandomness,
        );
        assert_eq!(thinking.at(0), "Хм");
        assert_eq!(thinking.at(5), "Хм");
    }

    #[test]
    fn default_timing_changes_the_phrase_five_times() {
        // 1.2 s rotation over a 6.5 s pause: changes at 1.2, 2.4, 3.6, 4.8 and 6.0 s
        assert_eq!(
            ticks_before_reveal(Duration::from_millis(1200), Duration::from_millis(6500)),
            5
        );
        assert_eq!(
            ticks_before_reveal(Duration::from_millis(1000), Duration::from_millis(3000)),
            2
        );
        assert_eq!(
            ticks_before_reveal(Duration::from_millis(5000), Duration::from_millis(4000)),
            0
        );
        assert_eq!(ticks_before_reveal(Duration::ZERO, Duration::from_millis(10)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_a_pending_reveal() {
        let tasks = RevealTasks::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        });
        tasks.schedule(1_i64, handle).await;
        assert!(tasks.is_pending(&1).await);
        assert!(!tasks.is_pending(&2).await);

        assert!(tasks.cancel(&1).await);
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(!fired.load(Ordering::SeqCst));
        assert!(!tasks.is_pending(&1).await);
        assert!(!tasks.cancel(&1).await);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduling_again_replaces_the_previous_reveal() {
        let tasks = RevealTasks::new();
        let first_fired = Arc::new(AtomicBool::new(false));
        let second_fired = Arc::new(AtomicBool::new(false));

        let flag = first_fired.clone();
        tasks
            .schedule(
                7_i64,
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    flag.store(true, Ordering::SeqCst);
                }),
            )
            .await;
        let flag = second_fired.clone();
        tasks
            .schedule(
                7_i64,
                tokio::spawn(async move {
                    flag.store(true, Ordering::SeqCst);
                }),
            )
            .await;

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!first_fired.load(Ordering::SeqCst));
        assert!(second_fired.load(Ordering::SeqCst));
        assert!(!tasks.is_pending(&7).await);
    }
}
