//! Sprite animation scheduler
//!
//! An [`Animation`] is an ordered set of equally sized frames - references
//! to caller-owned [`MonoImage`]s, never copies - played at a fixed frame
//! period. A [`Schedule`] multiplexes any number of running animations
//! over one display: each distinct `(x, y, animation)` triple gets one
//! live [`Instance`](InstanceHandle) holding the current frame index and
//! the tick its next frame is due.
//!
//! Advancement is purely tick-driven polling; there are no timers and no
//! callbacks. A host loop passes its monotonic tick into
//! [`Schedule::play`] for each active sprite and can ask
//! [`Schedule::poll`] first to learn whether a panel refresh would show
//! anything new:
//!
//! ```rust,no_run
//! # use embedded_hal::delay::DelayNs;
//! # use monopanel::{Animation, Display, DisplayInterface, MonoImage, Rotation, Schedule, Ssd1306};
//! # struct NullBus;
//! # impl DisplayInterface for NullBus {
//! #     type Error = core::convert::Infallible;
//! #     fn initialize(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
//! #     fn write_command(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # fn now() -> u64 { 0 }
//! static FRAME_A: [u8; 8] = [0xFF; 8];
//! static FRAME_B: [u8; 8] = [0x81; 8];
//! static IMG_A: MonoImage<'static> = MonoImage::new(8, 8, &FRAME_A);
//! static IMG_B: MonoImage<'static> = MonoImage::new(8, 8, &FRAME_B);
//!
//! let mut buffer = [0u8; 1024];
//! # let mut display = match Display::new(NullBus, Ssd1306, Rotation::Rotate0, &mut buffer[..]) {
//! #     Ok(display) => display,
//! #     Err(_) => return,
//! # };
//! let mut spinner = Animation::new(100, &IMG_A);
//! let _ = spinner.add_frame(&IMG_B);
//!
//! let mut schedule = Schedule::new(1);
//! loop {
//!     if schedule.poll(now()) {
//!         schedule.play(&mut display, 60, 28, &spinner, false, now());
//!         let _ = display.refresh();
//!     }
//! }
//! ```

use alloc::vec::Vec;

use crate::display::Display;
use crate::image::MonoImage;
use crate::interface::DisplayInterface;
use crate::model::Model;

/// Monotonic tick, in whatever unit the host's clock provides
///
/// Frame periods are expressed in the same unit. Tick zero is reserved:
/// an instance with `next_due == 0` is pending its first frame.
pub type Tick = u64;

/// Errors from animation assembly
#[derive(Debug, PartialEq, Eq)]
pub enum AnimError {
    /// An added frame does not match the first frame's size
    FrameSizeMismatch {
        /// Cell size fixed by the first frame
        expected: (u16, u16),
        /// Size of the rejected frame
        got: (u16, u16),
    },
}

impl core::fmt::Display for AnimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FrameSizeMismatch { expected, got } => write!(
                f,
                "frame size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
        }
    }
}

impl core::error::Error for AnimError {}

/// A looping sprite: equally sized frames at a fixed period
///
/// Frames are referenced, not owned; the animation can be shared by any
/// number of instances across schedules.
pub struct Animation<'a> {
    /// Cell width in pixels, fixed by the first frame
    width: u16,
    /// Cell height in pixels
    height: u16,
    /// Ticks between frames
    frame_period: u32,
    /// Ordered frames
    frames: Vec<&'a MonoImage<'a>>,
}

impl<'a> Animation<'a> {
    /// Create an animation from its first frame
    ///
    /// The first frame fixes the cell size; `frame_period` is in host
    /// ticks.
    pub fn new(frame_period: u32, first_frame: &'a MonoImage<'a>) -> Self {
        let mut frames = Vec::new();
        frames.push(first_frame);
        Self {
            width: first_frame.width(),
            height: first_frame.height(),
            frame_period,
            frames,
        }
    }

    /// Append a frame
    ///
    /// # Errors
    ///
    /// [`AnimError::FrameSizeMismatch`] if the frame's size differs from
    /// the first frame's.
    pub fn add_frame(&mut self, frame: &'a MonoImage<'a>) -> Result<(), AnimError> {
        if frame.width() != self.width || frame.height() != self.height {
            log::error!(
                "frame size mismatch: expected {}x{}, got {}x{}",
                self.width,
                self.height,
                frame.width(),
                frame.height()
            );
            return Err(AnimError::FrameSizeMismatch {
                expected: (self.width, self.height),
                got: (frame.width(), frame.height()),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Cell width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Cell height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Ticks between frames
    pub fn frame_period(&self) -> u32 {
        self.frame_period
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The frame at `index`
    pub fn frame(&self, index: usize) -> Option<&'a MonoImage<'a>> {
        self.frames.get(index).copied()
    }
}

/// Opaque handle to a live animation instance
///
/// Stamped with a generation so a handle goes stale when its instance is
/// destroyed, even if the slot is later reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceHandle {
    index: usize,
    generation: u32,
}

/// Live state of one animation playing at one position
struct Instance<'a> {
    x: u16,
    y: u16,
    reverse: bool,
    frame_index: usize,
    /// Tick the next frame is due; 0 = first frame pending
    next_due: Tick,
    anim: &'a Animation<'a>,
    generation: u32,
}

impl Instance<'_> {
    fn due(&self, now: Tick) -> bool {
        self.next_due == 0 || now >= self.next_due
    }
}

/// Per-display registry of running animation instances
///
/// Holds at most one instance per distinct `(x, y, animation)` triple.
/// The schedule does not own the display; [`play`](Self::play) borrows it
/// for the duration of the call.
pub struct Schedule<'a> {
    /// Caller-chosen identifier (a page id, for instance)
    id: u32,
    /// Slot arena; freed slots are reused
    slots: Vec<Option<Instance<'a>>>,
    /// Next generation stamp
    next_generation: u32,
}

impl<'a> Schedule<'a> {
    /// Create an empty schedule
    pub fn new(id: u32) -> Self {
        Self {
            id,
            slots: Vec::new(),
            next_generation: 1,
        }
    }

    /// The caller-chosen identifier
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether no instances are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, x: u16, y: u16, anim: &Animation<'a>) -> Option<InstanceHandle> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            slot.as_ref().and_then(|inst| {
                (inst.x == x && inst.y == y && core::ptr::eq(inst.anim, anim)).then_some(
                    InstanceHandle {
                        index,
                        generation: inst.generation,
                    },
                )
            })
        })
    }

    fn insert(&mut self, x: u16, y: u16, anim: &'a Animation<'a>, reverse: bool) -> InstanceHandle {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        let instance = Instance {
            x,
            y,
            reverse,
            frame_index: 0,
            next_due: 0,
            anim,
            generation,
        };
        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = Some(instance);
                free
            }
            None => {
                self.slots.push(Some(instance));
                self.slots.len() - 1
            }
        };
        InstanceHandle { index, generation }
    }

    fn instance_mut(&mut self, handle: InstanceHandle) -> Option<&mut Instance<'a>> {
        self.slots
            .get_mut(handle.index)?
            .as_mut()
            .filter(|inst| inst.generation == handle.generation)
    }

    fn instance(&self, handle: InstanceHandle) -> Option<&Instance<'a>> {
        self.slots
            .get(handle.index)?
            .as_ref()
            .filter(|inst| inst.generation == handle.generation)
    }

    /// Play an animation at `(x, y)`, creating the instance on first call
    ///
    /// When the instance is due - pending its first frame, or `now` has
    /// reached its deadline - the current frame is drawn through the
    /// display's compositor, the frame index advances modulo the frame
    /// count, and the next deadline is set to `now + frame_period`.
    /// Otherwise nothing is drawn.
    ///
    /// Returns the instance handle in either case, so polling repeatedly
    /// is idempotent. The `reverse` flag is latched when the instance is
    /// created.
    pub fn play<I, M, B>(
        &mut self,
        display: &mut Display<I, M, B>,
        x: u16,
        y: u16,
        anim: &'a Animation<'a>,
        reverse: bool,
        now: Tick,
    ) -> InstanceHandle
    where
        I: DisplayInterface,
        M: Model,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let handle = match self.find(x, y, anim) {
            Some(handle) => handle,
            None => self.insert(x, y, anim, reverse),
        };

        if let Some(inst) = self.instance_mut(handle) {
            if inst.due(now) {
                if let Some(frame) = anim.frame(inst.frame_index) {
                    display.draw_image(i32::from(inst.x), i32::from(inst.y), frame, inst.reverse);
                }
                inst.frame_index = (inst.frame_index + 1) % anim.frame_count();
                inst.next_due = now + Tick::from(anim.frame_period);
            }
        }

        handle
    }

    /// Whether at least one instance is due at `now`
    ///
    /// A pure scan: no frame index or deadline is touched. Callers use
    /// this to decide whether a refresh is worthwhile; a due instance
    /// still needs a [`play`](Self::play) call to actually advance.
    pub fn poll(&self, now: Tick) -> bool {
        self.slots.iter().flatten().any(|inst| inst.due(now))
    }

    /// Destroy one instance
    ///
    /// Stale handles (already destroyed, or from a reused slot) are
    /// ignored. The animation object is untouched.
    pub fn destroy(&mut self, handle: InstanceHandle) {
        if self.instance(handle).is_some() {
            self.slots[handle.index] = None;
        }
    }

    /// Drop every instance
    ///
    /// Animation objects are never owned by the schedule and survive.
    pub fn release_all(&mut self) {
        self.slots.clear();
    }

    /// Current frame index of an instance, if the handle is live
    pub fn frame_index(&self, handle: InstanceHandle) -> Option<usize> {
        self.instance(handle).map(|inst| inst.frame_index)
    }

    /// Next-due tick of an instance, if the handle is live
    ///
    /// Zero means the first frame has not been drawn yet.
    pub fn next_due(&self, handle: InstanceHandle) -> Option<Tick> {
        self.instance(handle).map(|inst| inst.next_due)
    }
}
