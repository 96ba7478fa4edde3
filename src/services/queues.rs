//! Queue status and wait-time estimation

use crate::{
    config::QueueConfig,
    error::AppResult,
    models::queue::QueueInfo,
    repository::Repository,
};

/// Expected wait in minutes for someone with `people` tickets ahead of them.
/// Pure function of the current queue depth and the scope's configured
/// average; no history, no adaptive learning.
pub fn estimate_wait(people: i64, average_service_time: i32) -> i64 {
    people.max(0) * average_service_time as i64
}

#[derive(Clone)]
pub struct QueuesService {
    repository: Repository,
    queue_config: QueueConfig,
}

impl QueuesService {
    pub fn new(repository: Repository, queue_config: QueueConfig) -> Self {
        Self { repository, queue_config }
    }

    /// Queue summary for status displays: current called number, depth and
    /// the estimated wait for a newcomer.
    pub async fn queue_info(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
    ) -> AppResult<QueueInfo> {
        self.repository.institutions.get_by_id(institution_id).await?;

        let queue = self
            .repository
            .queues
            .get_for_scope(institution_id, service_id)
            .await?;

        let people_waiting = self
            .repository
            .queues
            .count_waiting(institution_id, service_id)
            .await?;

        let (current_ticket_number, average_service_time) = match queue {
            Some(q) => (q.current_ticket_number, q.average_service_time),
            None => (None, self.queue_config.default_average_service_time),
        };

        Ok(QueueInfo {
            institution_id,
            service_id,
            current_ticket_number,
            people_waiting,
            estimated_wait_time: estimate_wait(people_waiting, average_service_time),
            average_service_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_is_people_ahead_times_average() {
        assert_eq!(estimate_wait(3, 5), 15);
        assert_eq!(estimate_wait(1, 12), 12);
    }

    #[test]
    fn wait_is_zero_when_nobody_is_ahead() {
        assert_eq!(estimate_wait(0, 5), 0);
        assert_eq!(estimate_wait(-1, 5), 0);
    }
}
