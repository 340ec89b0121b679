//! The round-robin distribution formula.
//!
//! This is the compatibility-critical piece of taskdist: the exact mapping
//! from task position to agent index must be preserved so that existing
//! stored distributions and their tests stay valid.

use crate::{Agent, CoreError};

/// Deterministic assignment plan for one distribution run.
///
/// For `n` tasks and `k` agents (`k >= 1`), task `i` (0-indexed, input
/// order) is assigned to agent index `(i / per_agent) % k`, where
/// `per_agent = ceil(n / k)`. Agent 0 receives the first `per_agent` tasks,
/// agent 1 the next `per_agent`, and so on; the final group can be short.
///
/// The `% k` wrap-around would only fire for `i >= per_agent * k`, and
/// `per_agent * k >= n` always holds under ceiling division, so the wrap is
/// an unreachable guard. It is kept verbatim rather than simplified away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionPlan {
    per_agent: usize,
    agent_count: usize,
}

impl DistributionPlan {
    /// Build a plan for `task_count` tasks over `agent_count` agents.
    ///
    /// Errors with [`CoreError::EmptyAgentPool`] when `agent_count == 0`;
    /// callers are expected to have checked this precondition already.
    pub fn new(task_count: usize, agent_count: usize) -> Result<Self, CoreError> {
        if agent_count == 0 {
            return Err(CoreError::EmptyAgentPool);
        }
        Ok(Self {
            per_agent: task_count.div_ceil(agent_count),
            agent_count,
        })
    }

    /// Tasks per agent group, `ceil(n / k)`.
    pub fn per_agent(&self) -> usize {
        self.per_agent
    }

    /// Agent index for the task at `position` in the input sequence.
    pub fn agent_for(&self, position: usize) -> usize {
        (position / self.per_agent) % self.agent_count
    }

    /// Pair each element of an input sequence with its assigned agent.
    pub fn assign<'a, T: 'a>(
        &'a self,
        items: impl IntoIterator<Item = T> + 'a,
    ) -> impl Iterator<Item = (usize, T)> + 'a {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (self.agent_for(i), item))
    }

    /// Resolve the agent assigned to `position` out of an ordered snapshot.
    ///
    /// The snapshot must be the same ordered sequence the plan was built
    /// for; assignment is purely positional.
    pub fn agent_at<'a>(&self, position: usize, agents: &'a [Agent]) -> &'a Agent {
        &agents[self.agent_for(position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn test_empty_pool_is_an_error() {
        assert!(matches!(
            DistributionPlan::new(5, 0),
            Err(CoreError::EmptyAgentPool)
        ));
    }

    #[test]
    fn test_even_ish_split_ten_over_three() {
        // n=10, k=3 -> per_agent=4; groups of 4, 4, 2.
        let plan = DistributionPlan::new(10, 3).unwrap();
        assert_eq!(plan.per_agent(), 4);
        let assigned: Vec<usize> = (0..10).map(|i| plan.agent_for(i)).collect();
        assert_eq!(assigned, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_seven_over_three() {
        // n=7, k=3 -> per_agent=3; groups of 3, 3, 1.
        let plan = DistributionPlan::new(7, 3).unwrap();
        let counts = count_per_agent(&plan, 7, 3);
        assert_eq!(counts, vec![3, 3, 1]);
    }

    #[test]
    fn test_coverage_and_sum() {
        // Every task lands on exactly one agent index in [0, k) and the
        // per-agent counts sum to n.
        for n in 1..=40 {
            for k in 1..=8 {
                let plan = DistributionPlan::new(n, k).unwrap();
                let counts = count_per_agent(&plan, n, k);
                assert_eq!(counts.iter().sum::<usize>(), n, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn test_determinism() {
        let a = DistributionPlan::new(23, 5).unwrap();
        let b = DistributionPlan::new(23, 5).unwrap();
        for i in 0..23 {
            assert_eq!(a.agent_for(i), b.agent_for(i));
        }
    }

    #[test]
    fn test_wrap_around_is_unreachable() {
        // Under ceiling division per_agent * k >= n, so i / per_agent never
        // reaches k for i < n. The % k in the formula is a dead guard;
        // assignments are monotone non-decreasing across the input.
        for n in 1..=60 {
            for k in 1..=10 {
                let plan = DistributionPlan::new(n, k).unwrap();
                let mut last = 0;
                for i in 0..n {
                    assert!(i / plan.per_agent() < k, "wrap fired for n={n} k={k} i={i}");
                    let idx = plan.agent_for(i);
                    assert!(idx >= last);
                    last = idx;
                }
            }
        }
    }

    #[test]
    fn test_assign_pairs_in_input_order() {
        let plan = DistributionPlan::new(4, 2).unwrap();
        let pairs: Vec<(usize, &str)> = plan.assign(["a", "b", "c", "d"]).collect();
        assert_eq!(pairs, vec![(0, "a"), (0, "b"), (1, "c"), (1, "d")]);
    }

    fn count_per_agent(plan: &DistributionPlan, n: usize, k: usize) -> Vec<usize> {
        let mut counts = vec![0usize; k];
        for i in 0..n {
            let idx = plan.agent_for(i);
            assert!(idx < k);
            counts[idx] += 1;
        }
        counts
    }
}
