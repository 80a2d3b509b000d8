//! Skeleton: keyframe evaluation, pose blending and graph commit.
//!
//! A [`Skeleton`] holds one [`InterpolatedKey`] per node of the rig it was
//! built from. Playback is split into two explicit steps:
//!
//! 1. [`Skeleton::add_time`] advances the play-head and samples every
//!    channel of the bound [`Animation`] into the matching slots.
//! 2. [`Skeleton::update_graph`] writes the written slots into the bound
//!    [`SceneGraph`] nodes as local TRS and invalidates them.
//!
//! Several skeletons built from the same rig can be combined with
//! [`Skeleton::blend`] before committing once.

use std::sync::Arc;

use arbor_scene::{NodeHandle, SceneGraph, SyncQueue};
use rustc_hash::FxHashMap;

use crate::animation::Animation;
use crate::interpolated_key::InterpolatedKey;
use crate::key::Key;

/// Construction options for a [`Skeleton`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonSettings {
    /// Whether playback wraps at either end of the animation instead of
    /// clamping.
    ///
    /// Default: `true`
    pub looping: bool,
}

impl Default for SkeletonSettings {
    fn default() -> Self {
        Self { looping: true }
    }
}

/// Keyframe evaluator driving a node hierarchy.
#[derive(Debug, Clone)]
pub struct Skeleton {
    animation: Option<Arc<Animation>>,
    time: f32,
    looping: bool,

    /// Pose slots, in depth-first order of the rig.
    keys: Vec<InterpolatedKey>,
    /// Slot lookup by node name. The first slot of a given name wins.
    key_index: FxHashMap<String, usize>,

    /// Slot of each animation channel, parallel to `Animation::nodes`.
    channel_slots: Vec<Option<usize>>,
    /// Remembered key index of each animation channel.
    cursors: Vec<usize>,

    graph: Option<NodeHandle>,
}

impl Skeleton {
    /// Builds one pose slot per node of the subtree at `root`.
    ///
    /// The skeleton is not bound to any graph yet; see
    /// [`set_graph`](Self::set_graph).
    #[must_use]
    pub fn new<Q: SyncQueue>(graph: &SceneGraph<Q>, root: NodeHandle) -> Self {
        Self::with_settings(graph, root, &SkeletonSettings::default())
    }

    #[must_use]
    pub fn with_settings<Q: SyncQueue>(graph: &SceneGraph<Q>, root: NodeHandle, settings: &SkeletonSettings) -> Self {
        let mut keys = Vec::new();
        let mut key_index = FxHashMap::default();
        graph.for_each(root, |_, node| {
            key_index.entry(node.name().to_string()).or_insert(keys.len());
            keys.push(InterpolatedKey::new(node.name()));
        });

        Self {
            animation: None,
            time: 0.0,
            looping: settings.looping,
            keys,
            key_index,
            channel_slots: Vec::new(),
            cursors: Vec::new(),
            graph: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn animation(&self) -> Option<&Arc<Animation>> {
        self.animation.as_ref()
    }

    /// Binds `animation` (or unbinds with `None`) and evaluates it at time 0.
    ///
    /// Channels without a slot of the same name are reported once here and
    /// skipped during playback.
    pub fn set_animation(&mut self, animation: Option<Arc<Animation>>) {
        self.channel_slots.clear();
        self.cursors.clear();

        if let Some(anim) = &animation {
            for node in anim.nodes() {
                let slot = self.key_index.get(node.name()).copied();
                if slot.is_none() {
                    log::warn!(
                        "Animation '{}': channel '{}' has no matching node in the skeleton",
                        anim.name(),
                        node.name()
                    );
                }
                self.channel_slots.push(slot);
            }
            self.cursors.resize(anim.nodes().len(), 0);
        }

        self.animation = animation;
        self.set_current_time(0.0);
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Jumps the play-head to `time` and re-evaluates every channel there.
    ///
    /// Out-of-range times are wrapped or clamped like in
    /// [`add_time`](Self::add_time). All cursors restart from the first key.
    pub fn set_current_time(&mut self, time: f32) {
        self.time = time;
        let duration = self.animation.as_ref().map_or(0.0, |a| a.duration());
        if self.time > duration || self.time < 0.0 {
            self.time = self.wrap_time(duration);
        }
        self.cursors.fill(0);
        self.evaluate(true);
    }

    #[inline]
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Root of the hierarchy the slots are bound to, if any.
    #[inline]
    #[must_use]
    pub fn graph(&self) -> Option<NodeHandle> {
        self.graph
    }

    #[inline]
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn interpolated_keys(&self) -> &[InterpolatedKey] {
        &self.keys
    }

    #[must_use]
    pub fn interpolated_key(&self, name: &str) -> Option<&InterpolatedKey> {
        self.key_index.get(name).and_then(|&i| self.keys.get(i))
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advances the play-head by `delta` and samples every channel.
    ///
    /// Past either end, a looping skeleton wraps (keeping the overshoot) and
    /// restarts its cursors from the end it re-enters at; otherwise time is
    /// clamped. A non-looping skeleton sitting at the end ignores further
    /// calls.
    pub fn add_time(&mut self, delta: f32) {
        let Some(duration) = self.animation.as_ref().map(|a| a.duration()) else {
            return;
        };
        if self.time == duration && !self.looping {
            return;
        }

        self.time += delta;

        if self.time > duration {
            self.time = self.wrap_time(duration);
            if self.looping {
                self.cursors.fill(0);
            }
        } else if self.time < 0.0 {
            self.time = self.wrap_time(duration);
            if self.looping
                && let Some(anim) = &self.animation
            {
                for (cursor, node) in self.cursors.iter_mut().zip(anim.nodes()) {
                    *cursor = node.keys().len().saturating_sub(2);
                }
            }
        }

        self.evaluate(delta >= 0.0);
    }

    /// Brings an out-of-range play-head back into `[0, duration]`.
    fn wrap_time(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 0.0;
        }
        if !self.looping {
            return self.time.clamp(0.0, duration);
        }
        let wrapped = self.time.rem_euclid(duration);
        if self.time < 0.0 && wrapped == 0.0 {
            duration
        } else {
            wrapped
        }
    }

    /// Samples every bound channel at the current time, searching from each
    /// channel's cursor in the given direction.
    ///
    /// When no key pair is found, the first or last key is used if the time
    /// lies at or beyond that end. A time inside the key range that the
    /// cursor has already moved past leaves the slot unwritten for this step.
    fn evaluate(&mut self, forward: bool) {
        let Self {
            animation,
            time,
            looping,
            keys,
            channel_slots,
            cursors,
            ..
        } = self;
        let Some(anim) = animation else {
            return;
        };
        let time = *time;

        for ((node, &slot), cursor) in anim.nodes().iter().zip(channel_slots.iter()).zip(cursors.iter_mut()) {
            let Some(index) = slot else {
                log::trace!("Channel '{}' skipped: no matching skeleton node", node.name());
                continue;
            };
            let Some(slot) = keys.get_mut(index) else {
                continue;
            };

            let frames = node.keys();
            let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
                continue;
            };
            if frames.len() == 1 {
                slot.set_pose(first.position, first.rotation, first.scale);
                continue;
            }

            if let Some(index) = seek(frames, time, *cursor, forward) {
                let (k1, k2) = (&frames[index], &frames[index + 1]);
                let span = k2.time - k1.time;
                let alpha = if span > 0.0 { (time - k1.time) / span } else { 0.0 };
                slot.set_pose(
                    k1.position.lerp(k2.position, alpha),
                    k1.rotation.slerp(k2.rotation, alpha),
                    k1.scale.lerp(k2.scale, alpha),
                );
                *cursor = index;
            } else if time <= first.time || (time == 0.0 && *looping) {
                slot.set_pose(first.position, first.rotation, first.scale);
            } else if time >= last.time {
                slot.set_pose(last.position, last.rotation, last.scale);
            }
        }
    }

    // ========================================================================
    // Blending
    // ========================================================================

    /// Mixes the poses of `a` and `b` into this skeleton.
    ///
    /// All three skeletons must come from the same rig; slots are matched by
    /// index. Where both sources wrote, the result is interpolated by
    /// `alpha` (0 gives `a`, 1 gives `b`). Where only one wrote, its pose is
    /// copied. Where neither wrote, the slot is left unwritten.
    pub fn blend(&mut self, a: &Skeleton, b: &Skeleton, alpha: f32) {
        if a.keys.len() != self.keys.len() || b.keys.len() != self.keys.len() {
            log::warn!(
                "Blending skeletons with different layouts ({} / {} / {} nodes); extra nodes are ignored",
                self.keys.len(),
                a.keys.len(),
                b.keys.len()
            );
        }

        for ((dst, ka), kb) in self.keys.iter_mut().zip(&a.keys).zip(&b.keys) {
            match (ka.written, kb.written) {
                (true, true) => dst.set_pose(
                    ka.position.lerp(kb.position, alpha),
                    ka.rotation.slerp(kb.rotation, alpha),
                    ka.scale.lerp(kb.scale, alpha),
                ),
                (true, false) => dst.copy_pose(ka),
                (false, true) => dst.copy_pose(kb),
                (false, false) => dst.written = false,
            }
        }
    }

    // ========================================================================
    // Graph Binding
    // ========================================================================

    /// Commits every written slot to its target node as local TRS, then
    /// clears the slot's `written` flag.
    ///
    /// Does nothing while no graph is bound. Written slots without a target
    /// are consumed without effect.
    pub fn update_graph<Q: SyncQueue>(&mut self, graph: &mut SceneGraph<Q>) {
        if self.graph.is_none() {
            return;
        }

        for key in self.keys.iter_mut().filter(|k| k.written) {
            if let Some(target) = key.target
                && !graph.set_local_trs(target, key.position, key.rotation, key.scale)
            {
                log::warn!("Skeleton target for '{}' no longer exists in the graph", key.name);
            }
            key.written = false;
        }
    }

    /// Binds every slot to the first node of the same name in the subtree at
    /// `root`, or unbinds all slots when `root` is `None`.
    pub fn set_graph<Q: SyncQueue>(&mut self, graph: &SceneGraph<Q>, root: Option<NodeHandle>) {
        self.graph = root;

        let mut bound = 0;
        for key in &mut self.keys {
            key.target = root.and_then(|r| graph.find_by_name(r, &key.name));
            if key.target.is_some() {
                bound += 1;
            }
        }

        log::debug!(
            "Skeleton bound to graph: {bound} of {} node(s) have a target",
            self.keys.len()
        );
    }
}

/// Index `i` of the key pair `[i, i + 1]` bracketing `time`, scanning from
/// `start` forward or backward.
fn seek(frames: &[Key], time: f32, start: usize, forward: bool) -> Option<usize> {
    let last_pair = frames.len().checked_sub(1)?;
    if start >= last_pair {
        return None;
    }
    let brackets = |i: &usize| frames[*i].time <= time && time <= frames[*i + 1].time;

    if forward {
        (start..last_pair).find(brackets)
    } else {
        (0..=start).rev().find(brackets)
    }
}
