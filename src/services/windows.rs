//! Pickup and delivery windows per cluster member
//!
//! The hub collects outbound freight from the swept dispatch time until the
//! last branch cutoff and accepts inbound freight from its own cutoff on.
//! Branches mirror that: pickups open an hour after their outbound cutoff,
//! deliveries must land before their inbound cutoff.

use crate::defaults::{
    BRANCH_LOWER_BOUND, BRANCH_UPPER_BOUND, HUB_LOWER_BOUND, HUB_UPPER_BOUND, ONE_HOUR,
};
use crate::services::network::Cluster;
use crate::types::{Cutoffs, TimeWindow};

/// Global time bounds in hours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBounds {
    pub branch_lower: f64,
    pub branch_upper: f64,
    pub hub_lower: f64,
    pub hub_upper: f64,
}

impl Default for TimeBounds {
    fn default() -> Self {
        Self {
            branch_lower: BRANCH_LOWER_BOUND,
            branch_upper: BRANCH_UPPER_BOUND,
            hub_lower: HUB_LOWER_BOUND,
            hub_upper: HUB_UPPER_BOUND,
        }
    }
}

impl TimeBounds {
    /// Window used for deliveries relaxed after an infeasible first epoch
    pub fn full_branch_day(&self) -> TimeWindow {
        TimeWindow::new(self.branch_lower, self.branch_upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberWindows {
    pub pickup: TimeWindow,
    pub delivery: TimeWindow,
}

/// Windows of every member of one cluster, in member order
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterWindows {
    members: Vec<MemberWindows>,
    hub_index: usize,
    max_branch_cutoff: f64,
}

impl ClusterWindows {
    /// Derive windows from member cutoffs (aligned with `cluster.members`).
    /// The hub pickup opens at `bounds.hub_lower` until a dispatch time is set.
    pub fn derive(cluster: &Cluster, cutoffs: &[Cutoffs], bounds: &TimeBounds) -> Self {
        debug_assert_eq!(cluster.len(), cutoffs.len());
        let hub_index = cluster.hub_index();

        let mut members: Vec<MemberWindows> = cutoffs
            .iter()
            .enumerate()
            .map(|(index, cutoffs)| {
                if index == hub_index {
                    MemberWindows {
                        pickup: TimeWindow::new(bounds.hub_lower, bounds.hub_lower),
                        delivery: TimeWindow::new(cutoffs.inbound as f64, bounds.hub_upper),
                    }
                } else {
                    MemberWindows {
                        pickup: TimeWindow::new(cutoffs.outbound as f64 + ONE_HOUR, bounds.branch_upper),
                        delivery: TimeWindow::new(bounds.branch_lower, cutoffs.inbound as f64),
                    }
                }
            })
            .collect();

        let max_branch_cutoff = members
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != hub_index)
            .map(|(_, windows)| windows.delivery.latest)
            .fold(bounds.hub_lower, f64::max);

        if let Some(hub) = members.get_mut(hub_index) {
            hub.pickup = TimeWindow::new(bounds.hub_lower, max_branch_cutoff);
        }

        Self {
            members,
            hub_index,
            max_branch_cutoff,
        }
    }

    /// Copy with the hub pickup opening at `dispatch_time`
    pub fn with_dispatch_time(&self, dispatch_time: f64) -> Self {
        let mut windows = self.clone();
        if let Some(hub) = windows.members.get_mut(self.hub_index) {
            hub.pickup = TimeWindow::new(dispatch_time, self.max_branch_cutoff);
        }
        windows
    }

    /// Latest branch delivery cutoff; closes the hub pickup and the sweep
    pub fn max_branch_cutoff(&self) -> f64 {
        self.max_branch_cutoff
    }

    pub fn pickup(&self, index: usize) -> TimeWindow {
        self.members[index].pickup
    }

    pub fn delivery(&self, index: usize) -> TimeWindow {
        self.members[index].delivery
    }
}
