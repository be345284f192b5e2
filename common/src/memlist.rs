//! System free-memory list.
//!
//! The list is owned by the OS and searched in order by every task's
//! allocator. Order is by descending priority; regions of equal priority
//! keep their insertion order, so a newly queued region lands after the
//! existing regions of its priority.
//!
//! Only the list itself and the two primitives that publish memory into it
//! live here. Carving allocations out of a region is the allocator's job.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

bitflags::bitflags! {
    /// Attributes of a free region, as requested by allocation calls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemAttributes: u32 {
        /// Memory may be shared between tasks.
        const PUBLIC = 1 << 0;
        /// Reachable by the custom chips.
        const CHIP = 1 << 1;
        /// Not contended by the custom chips.
        const FAST = 1 << 2;
        /// Survives a reset.
        const LOCAL = 1 << 8;
        /// Reachable by 24-bit DMA masters.
        const DMA24 = 1 << 9;
        /// Usable by the boot ROM before the system is up.
        const KICK = 1 << 10;
    }
}

/// Index of a region within the list.
///
/// Only stable while the list is not re-sequenced, so it must not be kept
/// past the guard it was obtained under.
pub type RegionIndex = usize;

/// One free-memory region descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeRegion {
    lower: u32,
    upper: u32,
    free: u32,
    pub attributes: MemAttributes,
    pub priority: i8,
    /// Shared so one name can label several regions.
    pub name: Option<Arc<str>>,
}

impl FreeRegion {
    /// Describe `[lower, upper)` with all of it free.
    pub fn new(lower: u32, upper: u32, attributes: MemAttributes, priority: i8) -> Self {
        Self {
            lower,
            upper,
            free: upper.saturating_sub(lower),
            attributes,
            priority,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Address the region is identified by.
    #[inline]
    pub fn base(&self) -> u32 {
        self.lower
    }

    #[inline]
    pub fn lower(&self) -> u32 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// Move the upper bound.
    ///
    /// Growing the bound does not make the new span allocatable; it still
    /// has to be released into the region with [`MemList::deallocate`].
    pub fn set_upper(&mut self, upper: u32) {
        self.upper = upper;
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.upper - self.lower
    }

    /// Bytes currently available for allocation.
    #[inline]
    pub fn free_bytes(&self) -> u32 {
        self.free
    }

    /// Whether `[lower, upper)` shares at least one byte with this region.
    pub fn overlaps(&self, lower: u32, upper: u32) -> bool {
        lower < self.upper && self.lower < upper
    }

    pub fn contains_range(&self, lower: u32, upper: u32) -> bool {
        self.lower <= lower && upper <= self.upper
    }
}

/// Errors returned by the list primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemListError {
    /// The range has no bytes
    EmptyRange,
    /// `base + size` does not fit the address space
    AddressOverflow,
    /// The range overlaps a region already in the list
    Overlap { lower: u32, upper: u32 },
    /// The sub-range is not inside the region it is released into
    OutOfBounds,
    /// No region at that index
    NoSuchRegion,
}

impl fmt::Display for MemListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange => write!(f, "empty memory range"),
            Self::AddressOverflow => write!(f, "memory range wraps the address space"),
            Self::Overlap { lower, upper } => {
                write!(f, "range overlaps region {lower:#08x}-{upper:#08x}")
            }
            Self::OutOfBounds => write!(f, "sub-range outside of its region"),
            Self::NoSuchRegion => write!(f, "no such region"),
        }
    }
}

impl core::error::Error for MemListError {}

fn range_end(base: u32, size: u32) -> Result<u32, MemListError> {
    if size == 0 {
        return Err(MemListError::EmptyRange);
    }
    base.checked_add(size).ok_or(MemListError::AddressOverflow)
}

/// Ordered list of free regions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemList {
    regions: Vec<FreeRegion>,
}

impl MemList {
    pub const fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in allocator search order.
    pub fn iter(&self) -> impl Iterator<Item = &FreeRegion> {
        self.regions.iter()
    }

    pub fn get(&self, index: RegionIndex) -> Option<&FreeRegion> {
        self.regions.get(index)
    }

    pub fn get_mut(&mut self, index: RegionIndex) -> Option<&mut FreeRegion> {
        self.regions.get_mut(index)
    }

    /// First region matching `pred`, in search order.
    pub fn position(&self, pred: impl FnMut(&FreeRegion) -> bool) -> Option<RegionIndex> {
        self.regions.iter().position(pred)
    }

    /// The region identified by `base`, if listed.
    pub fn find_base(&self, base: u32) -> Option<RegionIndex> {
        self.position(|region| region.base() == base)
    }

    /// First listed region sharing a byte with `[lower, upper)`.
    pub fn overlapping(&self, lower: u32, upper: u32) -> Option<&FreeRegion> {
        self.regions
            .iter()
            .find(|region| region.overlaps(lower, upper))
    }

    /// Insert `region` after every region of the same or higher priority.
    pub fn enqueue(&mut self, region: FreeRegion) -> RegionIndex {
        let at = self
            .regions
            .iter()
            .position(|r| r.priority < region.priority)
            .unwrap_or(self.regions.len());
        self.regions.insert(at, region);
        at
    }

    /// Take the region out and queue it again by its current priority.
    ///
    /// Callers hold the list guard across the whole call, so the region is
    /// never observed missing.
    pub fn requeue(&mut self, index: RegionIndex) -> Result<RegionIndex, MemListError> {
        if index >= self.regions.len() {
            return Err(MemListError::NoSuchRegion);
        }
        let region = self.regions.remove(index);
        Ok(self.enqueue(region))
    }

    /// Register `[base, base + size)` as a new free region.
    ///
    /// Refuses ranges that overlap a listed region.
    pub fn add_mem_list(
        &mut self,
        size: u32,
        attributes: MemAttributes,
        priority: i8,
        base: u32,
        name: Option<Arc<str>>,
    ) -> Result<RegionIndex, MemListError> {
        let upper = range_end(base, size)?;
        if let Some(region) = self.overlapping(base, upper) {
            return Err(MemListError::Overlap {
                lower: region.lower(),
                upper: region.upper(),
            });
        }

        let mut region = FreeRegion::new(base, upper, attributes, priority);
        region.name = name;
        log::trace!("memlist: add {base:#08x}-{upper:#08x} pri {priority}");
        Ok(self.enqueue(region))
    }

    /// Release `[base, base + size)` into the region at `index`.
    ///
    /// The sub-range must already lie within the region's bounds.
    pub fn deallocate(
        &mut self,
        index: RegionIndex,
        base: u32,
        size: u32,
    ) -> Result<(), MemListError> {
        let upper = range_end(base, size)?;
        let region = self
            .regions
            .get_mut(index)
            .ok_or(MemListError::NoSuchRegion)?;
        if !region.contains_range(base, upper) {
            return Err(MemListError::OutOfBounds);
        }
        region.free = region.free.saturating_add(size).min(region.size());
        Ok(())
    }
}
