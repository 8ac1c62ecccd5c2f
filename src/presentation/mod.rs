//! Visual instance requests
//!
//! The simulation never renders. It asks a [`VisualSink`] for one instance per
//! unit and hands the instance back when the unit dies or its group is removed.

use ahash::{AHashMap, AHashSet};

use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, VisualHandle};
use crate::units::group::UnitGroup;
use crate::units::unit::{SingleUnit, UnitKind};

/// Presentation backend that owns visual instances
pub trait VisualSink {
    /// Create an instance for one unit of `group`
    fn add_instance(&mut self, group: GroupId, kind: UnitKind, tint: [f32; 4])
        -> Result<VisualHandle>;

    fn remove_instance(&mut self, handle: VisualHandle);
}

impl<V: VisualSink + ?Sized> VisualSink for &mut V {
    fn add_instance(
        &mut self,
        group: GroupId,
        kind: UnitKind,
        tint: [f32; 4],
    ) -> Result<VisualHandle> {
        (**self).add_instance(group, kind, tint)
    }

    fn remove_instance(&mut self, handle: VisualHandle) {
        (**self).remove_instance(handle);
    }
}

/// Give every unit of a group without a visual a fresh instance
///
/// Failures are logged and leave that unit without a visual.
pub fn attach_visuals(group: &mut UnitGroup, sink: &mut dyn VisualSink) {
    let id = group.id;
    let tint = group.alignment.tint();
    for unit in group.units_mut().iter_mut().filter(|u| u.visual.is_none()) {
        match sink.add_instance(id, unit.kind, tint) {
            Ok(handle) => unit.visual = Some(handle),
            Err(err) => {
                tracing::warn!(group = %id, kind = ?unit.kind, "no visual for unit: {err}");
            }
        }
    }
}

/// Release the visuals of units leaving the simulation
pub fn release_visuals<'a>(
    units: impl IntoIterator<Item = &'a SingleUnit>,
    sink: &mut dyn VisualSink,
) {
    for handle in units.into_iter().filter_map(|u| u.visual) {
        sink.remove_instance(handle);
    }
}

/// Headless backend: hands out handles and keeps nothing
#[derive(Debug, Default)]
pub struct NullVisuals {
    next: u64,
}

impl VisualSink for NullVisuals {
    fn add_instance(&mut self, _: GroupId, _: UnitKind, _: [f32; 4]) -> Result<VisualHandle> {
        self.next += 1;
        Ok(VisualHandle(self.next))
    }

    fn remove_instance(&mut self, _: VisualHandle) {}
}

/// Backend that tracks live instances, with optional per-kind load failures
#[derive(Debug, Default)]
pub struct RecordingVisuals {
    next: u64,
    live: AHashMap<VisualHandle, (GroupId, UnitKind)>,
    missing_assets: AHashSet<UnitKind>,
    removed: Vec<VisualHandle>,
}

impl RecordingVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `add_instance` for `kind` fail as if its asset were missing
    pub fn with_missing_asset(mut self, kind: UnitKind) -> Self {
        self.missing_assets.insert(kind);
        self
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_for(&self, group: GroupId) -> usize {
        self.live.values().filter(|(g, _)| *g == group).count()
    }

    pub fn removed(&self) -> &[VisualHandle] {
        &self.removed
    }
}

impl VisualSink for RecordingVisuals {
    fn add_instance(
        &mut self,
        group: GroupId,
        kind: UnitKind,
        _tint: [f32; 4],
    ) -> Result<VisualHandle> {
        if self.missing_assets.contains(&kind) {
            return Err(SimError::AssetLoad(format!("no model for {kind:?}")));
        }
        self.next += 1;
        let handle = VisualHandle(self.next);
        self.live.insert(handle, (group, kind));
        Ok(handle)
    }

    fn remove_instance(&mut self, handle: VisualHandle) {
        if self.live.remove(&handle).is_some() {
            self.removed.push(handle);
        }
    }
}
