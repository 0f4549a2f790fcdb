//! Largest-footprint resolution
//!
//! The representative footprint is the container whose CPU *and* memory both
//! exceed the running maximum at the time it is seen. A container that beats
//! only one dimension is skipped entirely, so the result always comes from a
//! single container spec (or is `(0, 0)` when none qualify).

use crate::error::EstimateResult;
use crate::models::{ContainerSpec, ResourceFootprint};
use crate::orchestrator::Orchestrator;
use tracing::debug;

/// Fold container specs into the representative footprint
pub fn largest_footprint<'a, I>(specs: I) -> ResourceFootprint
where
    I: IntoIterator<Item = &'a ContainerSpec>,
{
    specs
        .into_iter()
        .fold(ResourceFootprint::default(), |current, spec| {
            if spec.cpu > current.cpu && spec.memory > current.memory {
                ResourceFootprint::new(spec.cpu, spec.memory)
            } else {
                current
            }
        })
}

/// Walk every service on the cluster and resolve the largest footprint
///
/// Services are visited in the order the orchestrator lists them, and
/// containers in task-definition order.
pub async fn resolve_largest_footprint(
    orchestrator: &dyn Orchestrator,
    cluster: &str,
) -> EstimateResult<ResourceFootprint> {
    let services = orchestrator.list_services(cluster).await?;
    let mut specs = Vec::new();

    for service in &services {
        let reference = orchestrator.describe_service(cluster, service).await?;
        let template = orchestrator.describe_workload_template(&reference).await?;
        debug!(
            service = %service,
            task_definition = %template.reference,
            containers = template.containers.len(),
            "Loaded task definition"
        );
        specs.extend(template.containers);
    }

    Ok(largest_footprint(&specs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(pairs: &[(u64, u64)]) -> Vec<ContainerSpec> {
        pairs.iter().map(|&(c, m)| ContainerSpec::new(c, m)).collect()
    }

    #[test]
    fn test_empty_specs_yield_zero() {
        assert_eq!(largest_footprint(&[]), ResourceFootprint::new(0, 0));
    }

    #[test]
    fn test_both_dimensions_must_exceed() {
        let result = largest_footprint(&specs(&[(10, 5), (5, 20)]));
        assert_eq!(result, ResourceFootprint::new(10, 5));
    }

    #[test]
    fn test_equal_values_do_not_update() {
        let result = largest_footprint(&specs(&[(256, 512), (256, 1024), (512, 512)]));
        assert_eq!(result, ResourceFootprint::new(256, 512));
    }

    #[test]
    fn test_strictly_larger_spec_always_wins() {
        let mut input = specs(&[(128, 256), (64, 1024), (512, 128)]);
        input.push(ContainerSpec::new(2048, 4096));

        assert_eq!(largest_footprint(&input), ResourceFootprint::new(2048, 4096));
    }

    #[test]
    fn test_zero_dimension_spec_never_qualifies() {
        let result = largest_footprint(&specs(&[(0, 512), (256, 0)]));
        assert_eq!(result, ResourceFootprint::new(0, 0));
    }

    #[test]
    fn test_mixed_services_walk() {
        // service A then service B, in listing order
        let result = largest_footprint(&specs(&[(256, 512), (512, 256), (128, 1024)]));
        assert_eq!(result, ResourceFootprint::new(256, 512));
    }
}
