//! Gauss-Seidel relaxation of distance constraints.
//!
//! Each pass walks every point in order and nudges both endpoints of each of
//! its constraints toward the rest length. Corrections are split by inverse
//! mass, which for equal masses is an even 0.5 / 0.5 split; pinned points have
//! zero inverse mass and never move. Several sequential passes approximate
//! solving the whole constraint graph at once.

use crate::arena::{Arena, PointId};
use crate::observer::StepObserver;
use crate::point::ConstrainedPoint;

const DEGENERATE_LENGTH: f32 = 1e-10;

/// Outcome of one [`relax`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RelaxReport {
    pub passes: usize,
    /// Constraints skipped because both endpoints coincided.
    pub degenerate: usize,
    /// Constraints skipped because their target no longer exists.
    pub dangling: usize,
}

pub(crate) fn relax<O: StepObserver>(
    points: &mut Arena<ConstrainedPoint>,
    order: &[PointId],
    iterations: usize,
    observer: &mut O,
) -> RelaxReport {
    let mut report = RelaxReport::default();

    for pass in 0..iterations {
        for &id in order {
            let count = points.get(id).map_or(0, |p| p.constraints().len());
            for k in 0..count {
                let Some(point) = points.get(id) else { break };
                let constraint = point.constraints()[k];
                let (p_pos, p_w) = (point.position, point.inv_mass());

                let Some(target) = points.get(constraint.target()) else {
                    report.dangling += 1;
                    continue;
                };
                let (t_pos, t_w) = (target.position, target.inv_mass());

                let delta = t_pos - p_pos;
                let length = delta.length();
                if length < DEGENERATE_LENGTH {
                    report.degenerate += 1;
                    continue;
                }
                if !constraint.kind().is_violated(length, constraint.rest_length()) {
                    continue;
                }
                let w_total = p_w + t_w;
                if w_total == 0.0 {
                    continue; // both pinned
                }

                let difference = (length - constraint.rest_length()) / length;
                let correction = delta * difference;
                if p_w > 0.0 {
                    if let Some(p) = points.get_mut(id) {
                        p.position += correction * (p_w / w_total);
                    }
                }
                if t_w > 0.0 {
                    if let Some(t) = points.get_mut(constraint.target()) {
                        t.position -= correction * (t_w / w_total);
                    }
                }
            }
        }
        observer.on_relaxation_pass(pass);
        report.passes += 1;
    }

    if report.degenerate > 0 || report.dangling > 0 {
        log::trace!(
            "relaxation skipped {} degenerate and {} dangling constraints over {} passes",
            report.degenerate,
            report.dangling,
            report.passes
        );
    }
    report
}
