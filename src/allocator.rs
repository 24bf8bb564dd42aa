//! Priority allocation of requested routes.
//!
//! Every train occupies some segments and requests some more. Trains are
//! handled in index order, and a train may only be granted locations that
//! no other train occupies and that no train before it has already been
//! granted in the same call. What a train gets is the longest prefix of
//! its request, taken segment by segment, that avoids those locations. A
//! granted route is always contiguous: the first segment that runs into a
//! forbidden location is cut short and nothing after it is granted.
//!
//! The caller is responsible for passing index-aligned lists of equal
//! length, with pairwise non-intersecting occupied routes on one track.

use crate::location::Location;
use crate::segment::Segment;
use log::*;
use std::collections::HashSet;
use velcro::iter;

pub fn allocate(occupied: &[Vec<Segment>], requested: &[Vec<Segment>]) -> Vec<Vec<Segment>> {
    let _h = hprof::enter("allocate");
    debug_assert_eq!(occupied.len(), requested.len());

    let occupied_locations = occupied
        .iter()
        .map(|route| route_locations(route))
        .collect::<Vec<_>>();

    let (allocated, granted) = requested.iter().enumerate().fold(
        (Vec::with_capacity(requested.len()), HashSet::<Location>::new()),
        |(mut allocated, granted), (train, request)| {
            let others = occupied_locations
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != train)
                .flat_map(|(_, locations)| locations.iter());
            let forbidden: HashSet<Location> = iter![..others, ..granted.iter()].cloned().collect();

            let route = allocate_train(train, request, &forbidden);
            let granted = iter![..granted, ..route_locations(&route)].collect::<HashSet<_>>();
            allocated.push(route);
            (allocated, granted)
        },
    );

    trace!("Granted {} locations in total", granted.len());
    allocated
}

/// The longest contiguous prefix of `request` avoiding `forbidden`.
fn allocate_train(
    train: usize,
    request: &[Segment],
    forbidden: &HashSet<Location>,
) -> Vec<Segment> {
    let mut route = Vec::new();
    for (idx, segment) in request.iter().enumerate() {
        if !segment.intersects_any(forbidden) {
            route.push(segment.clone());
            continue;
        }

        match segment.longest_valid_prefix(forbidden) {
            Some(prefix) => {
                debug!(
                    "Train {}: segment {} ({}) truncated to {}",
                    train, idx, segment, prefix
                );
                route.push(prefix);
            }
            None => debug!("Train {}: segment {} ({}) refused", train, idx, segment),
        }
        if idx + 1 < request.len() {
            debug!(
                "Train {}: dropping {} segments after the conflict",
                train,
                request.len() - idx - 1
            );
        }
        break;
    }

    if route.is_empty() && !request.is_empty() {
        warn!("Train {} could not be allocated any of its request", train);
    } else {
        debug!("Train {}: allocated {} of {} segments", train, route.len(), request.len());
    }
    route
}

fn route_locations(route: &[Segment]) -> HashSet<Location> {
    route.iter().flat_map(|s| s.locations()).collect()
}
