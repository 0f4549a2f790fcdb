//! Fleet-wide schedulable capacity
//!
//! Each instance contributes `min(cpu / footprint.cpu, memory / footprint.memory)`
//! using integer division. A footprint dimension of zero places no limit on
//! that resource. When both dimensions are zero there is no basis for an
//! estimate and every instance contributes 0.

use crate::models::{
    CapacityEstimate, InstanceCapacity, InstanceHeadroom, ResourceFootprint, SchedulableCount,
};

/// Copies that fit in `available` units, or `None` if the demand is zero
fn fits(available: u64, demand: u64) -> Option<u64> {
    available.checked_div(demand)
}

/// Capacity of a single instance
pub fn instance_capacity(footprint: &ResourceFootprint, instance: &InstanceHeadroom) -> InstanceCapacity {
    let by_cpu = fits(instance.available_cpu, footprint.cpu);
    let by_memory = fits(instance.available_memory, footprint.memory);

    let schedulable = match (by_cpu, by_memory) {
        (Some(cpu), Some(mem)) => cpu.min(mem),
        (Some(cpu), None) => cpu,
        (None, Some(mem)) => mem,
        (None, None) => 0,
    };

    InstanceCapacity {
        instance_id: instance.instance_id.clone(),
        by_cpu,
        by_memory,
        schedulable,
    }
}

/// Estimate how many more footprints the fleet can host
pub fn estimate_schedulable(
    footprint: ResourceFootprint,
    instances: &[InstanceHeadroom],
) -> CapacityEstimate {
    let instances: Vec<InstanceCapacity> = instances
        .iter()
        .map(|instance| instance_capacity(&footprint, instance))
        .collect();

    let total = instances
        .iter()
        .fold(0u64, |acc, i| acc.saturating_add(i.schedulable));

    CapacityEstimate {
        footprint,
        instances,
        total,
        degenerate: footprint.is_degenerate(),
    }
}

/// Total only, without the per-instance breakdown
pub fn estimate_count(footprint: ResourceFootprint, instances: &[InstanceHeadroom]) -> SchedulableCount {
    estimate_schedulable(footprint, instances).total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_of_dimensions() {
        let footprint = ResourceFootprint::new(2, 4);
        let instances = vec![InstanceHeadroom::new("i-1", 10, 12)];

        let estimate = estimate_schedulable(footprint, &instances);
        assert_eq!(estimate.total, 3);
        assert_eq!(estimate.instances[0].by_cpu, Some(5));
        assert_eq!(estimate.instances[0].by_memory, Some(3));
        assert!(!estimate.degenerate);
    }

    #[test]
    fn test_instances_sum_independently() {
        let footprint = ResourceFootprint::new(2, 4);
        let instances = vec![
            InstanceHeadroom::new("i-1", 10, 12),
            InstanceHeadroom::new("i-2", 6, 14),
        ];

        assert_eq!(estimate_count(footprint, &instances), 6);
    }

    #[test]
    fn test_zero_cpu_is_unbounded() {
        let footprint = ResourceFootprint::new(0, 4);
        let instances = vec![InstanceHeadroom::new("i-1", 0, 12)];

        let estimate = estimate_schedulable(footprint, &instances);
        assert_eq!(estimate.total, 3);
        assert_eq!(estimate.instances[0].by_cpu, None);
    }

    #[test]
    fn test_zero_memory_is_unbounded() {
        let footprint = ResourceFootprint::new(256, 0);
        let instances = vec![InstanceHeadroom::new("i-1", 1024, 0)];

        assert_eq!(estimate_count(footprint, &instances), 4);
    }

    #[test]
    fn test_degenerate_footprint_yields_zero() {
        let instances = vec![
            InstanceHeadroom::new("i-1", 1024, 2048),
            InstanceHeadroom::new("i-2", 4096, 8192),
        ];

        let estimate = estimate_schedulable(ResourceFootprint::default(), &instances);
        assert_eq!(estimate.total, 0);
        assert!(estimate.degenerate);
        assert!(estimate.instances.iter().all(|i| i.schedulable == 0));
    }

    #[test]
    fn test_empty_fleet_yields_zero() {
        assert_eq!(estimate_count(ResourceFootprint::new(256, 512), &[]), 0);
        assert_eq!(estimate_count(ResourceFootprint::default(), &[]), 0);
    }

    #[test]
    fn test_floor_division() {
        let footprint = ResourceFootprint::new(256, 512);
        let instances = vec![InstanceHeadroom::new("i-1", 1023, 2047)];

        assert_eq!(estimate_count(footprint, &instances), 3);
    }
}
