use std::collections::HashMap;
use std::sync::Arc;

use super::{ClockStyle, DrawingBackend, RenderError, Rgb, SurfaceId};
use crate::alarm::AlarmTime;
use crate::log_debug;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

struct HeldIcon<I> {
    icon: Arc<I>,
    time: AlarmTime,
}

/// Holds at most one rendered icon per surface.
///
/// A surface's icon is built once, on its first update, and from then on only
/// mutated: widgets keep the `Arc` they were handed and see every later time
/// without being reassigned. Only `evict` makes the next update build again.
pub struct IconSurfaceCache<B: DrawingBackend> {
    backend: B,
    held: HashMap<SurfaceId, HeldIcon<B::Icon>>,
}

impl<B: DrawingBackend> IconSurfaceCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            held: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the surface's icon showing `time`, building it if the surface
    /// holds none. On a render failure the surface stays empty.
    pub fn ensure_rendered(
        &mut self,
        surface: &SurfaceId,
        time: AlarmTime,
        style: ClockStyle,
        color: Rgb,
    ) -> Result<Arc<B::Icon>, RenderError> {
        if let Some(held) = self.held.get_mut(surface) {
            if held.time != time {
                self.backend.mutate(&held.icon, time);
                held.time = time;
            }
            return Ok(Arc::clone(&held.icon));
        }

        let icon = Arc::new(self.backend.render(style, color, time)?);
        log_debug!("Built clock icon for {surface} at {time}");
        self.held.insert(
            surface.clone(),
            HeldIcon {
                icon: Arc::clone(&icon),
                time,
            },
        );
        Ok(icon)
    }

    /// Applies one time to every surface in `surfaces`, or to none of them.
    ///
    /// Missing icons are built first; if any build fails the group is left
    /// exactly as it was. Handles come back in the order of `surfaces`.
    pub fn ensure_rendered_all(
        &mut self,
        surfaces: &[SurfaceId],
        time: AlarmTime,
        style: ClockStyle,
        color: Rgb,
    ) -> Result<Vec<Arc<B::Icon>>, RenderError> {
        let mut built: Vec<(SurfaceId, Arc<B::Icon>)> = Vec::new();
        for surface in surfaces {
            if self.held.contains_key(surface) || built.iter().any(|(s, _)| s == surface) {
                continue;
            }
            let icon = self.backend.render(style, color, time)?;
            built.push((surface.clone(), Arc::new(icon)));
        }

        for (surface, icon) in built {
            log_debug!("Built clock icon for {surface} at {time}");
            self.held.insert(surface, HeldIcon { icon, time });
        }

        let mut handles = Vec::with_capacity(surfaces.len());
        for surface in surfaces {
            handles.push(self.ensure_rendered(surface, time, style, color)?);
        }
        Ok(handles)
    }

    /// Reapplies presentation properties without touching the time. Returns
    /// `false` when the surface holds no icon.
    pub fn restyle(&mut self, surface: &SurfaceId, color: Rgb) -> bool {
        match self.held.get(surface) {
            Some(held) => {
                self.backend.restyle(&held.icon, color);
                true
            }
            None => false,
        }
    }

    /// Forgets the surface's icon. Returns the dropped handle, if any.
    pub fn evict(&mut self, surface: &SurfaceId) -> Option<Arc<B::Icon>> {
        let removed = self.held.remove(surface).map(|held| held.icon);
        if removed.is_some() {
            log_debug!("Evicted clock icon for {surface}");
        }
        removed
    }

    /// Evicts every surface matching `predicate` and returns their ids.
    pub fn evict_where(&mut self, mut predicate: impl FnMut(&SurfaceId) -> bool) -> Vec<SurfaceId> {
        let doomed: Vec<SurfaceId> = self.held.keys().filter(|s| predicate(s)).cloned().collect();
        for surface in &doomed {
            self.evict(surface);
        }
        doomed
    }

    pub fn icon(&self, surface: &SurfaceId) -> Option<Arc<B::Icon>> {
        self.held.get(surface).map(|held| Arc::clone(&held.icon))
    }

    pub fn last_time(&self, surface: &SurfaceId) -> Option<AlarmTime> {
        self.held.get(surface).map(|held| held.time)
    }

    pub fn contains(&self, surface: &SurfaceId) -> bool {
        self.held.contains_key(surface)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
