// Copyright 2023 Greptime Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::Rng;

/// The probing policy of the lease allocators: up to `budget` independent
/// uniform draws from `[0, space)`.
///
/// Random probing spreads concurrent allocators over the address space
/// instead of funneling them through a hot "next free" counter; the store's
/// insert-if-absent decides each probe. The policy itself is pure, so it can
/// be driven by a seeded rng in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePlan {
    space: u64,
    budget: u32,
}

impl ProbePlan {
    pub fn new(space: u64, budget: u32) -> Self {
        Self { space, budget }
    }

    pub fn space(&self) -> u64 {
        self.space
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Yields at most `budget` candidates; none when the space is empty.
    pub fn candidates<R: Rng>(self, rng: &mut R) -> impl Iterator<Item = u64> + '_ {
        let budget = if self.space == 0 { 0 } else { self.budget };
        (0..budget).map(move |_| rng.random_range(0..self.space))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_probe_plan_bounds() {
        let plan = ProbePlan::new(10, 100);
        let mut rng = StdRng::seed_from_u64(42);
        let candidates = plan.candidates(&mut rng).collect::<Vec<_>>();
        assert_eq!(100, candidates.len());
        assert!(candidates.iter().all(|c| *c < 10));
    }

    #[test]
    fn test_probe_plan_deterministic_with_seed() {
        let plan = ProbePlan::new(1 << 32, 16);
        let first = plan
            .candidates(&mut StdRng::seed_from_u64(7))
            .collect::<Vec<_>>();
        let second = plan
            .candidates(&mut StdRng::seed_from_u64(7))
            .collect::<Vec<_>>();
        assert_eq!(first, second);

        let other = plan
            .candidates(&mut StdRng::seed_from_u64(8))
            .collect::<Vec<_>>();
        assert_ne!(first, other);
    }

    #[test]
    fn test_probe_plan_empty_space() {
        let plan = ProbePlan::new(0, 5);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(0, plan.candidates(&mut rng).count());
    }

    #[test]
    fn test_probe_plan_zero_budget() {
        let plan = ProbePlan::new(10, 0);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(0, plan.candidates(&mut rng).count());
    }
}
