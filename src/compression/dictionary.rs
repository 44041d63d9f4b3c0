//! LZW string table backed by a paged arena
//!
//! Entries are byte strings stored back to back in fixed-size pages and
//! addressed by [`Span`] indices. Clearing the table only rewinds the arena
//! cursor; the pages themselves are reused until the decoder is dropped.

use crate::tiff::constants::lzw::{FIRST_FREE_CODE, MAX_ENTRIES};

/// Location of one entry inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    page: u32,
    start: u32,
    len: u32,
}

impl Span {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bump allocator over a list of fixed-size pages
#[derive(Debug)]
pub struct PagedArena {
    pages: Vec<Vec<u8>>,
    page_size: usize,
    current: usize,
    used: usize,
}

impl PagedArena {
    pub fn new(page_size: usize) -> Self {
        PagedArena {
            pages: Vec::new(),
            page_size: page_size.max(1),
            current: 0,
            used: 0,
        }
    }

    /// Reserves `len` bytes in the current page, or moves on to the next one
    pub fn alloc(&mut self, len: usize) -> Span {
        let fits = self
            .pages
            .get(self.current)
            .map_or(false, |page| page.len() - self.used >= len);

        if !fits {
            if !self.pages.is_empty() {
                self.current += 1;
            }
            self.used = 0;
            let size = self.page_size.max(len);
            match self.pages.get_mut(self.current) {
                Some(page) if page.len() >= size => {}
                Some(page) => *page = vec![0; size],
                None => self.pages.push(vec![0; size]),
            }
        }

        let span = Span {
            page: self.current as u32,
            start: self.used as u32,
            len: len as u32,
        };
        self.used += len;
        span
    }

    pub fn bytes(&self, span: Span) -> &[u8] {
        let start = span.start as usize;
        &self.pages[span.page as usize][start..start + span.len()]
    }

    pub fn bytes_mut(&mut self, span: Span) -> &mut [u8] {
        let start = span.start as usize;
        &mut self.pages[span.page as usize][start..start + span.len()]
    }

    /// Allocates a copy of `src` with `byte` appended
    pub fn alloc_extended(&mut self, src: Span, byte: u8) -> Span {
        let dst = self.alloc(src.len() + 1);
        let (src_start, dst_start, len) = (src.start as usize, dst.start as usize, src.len());

        if src.page == dst.page {
            let page = &mut self.pages[dst.page as usize];
            page.copy_within(src_start..src_start + len, dst_start);
            page[dst_start + len] = byte;
        } else {
            let (src_page, dst_page) = pages_pair(&mut self.pages, src.page as usize, dst.page as usize);
            dst_page[dst_start..dst_start + len].copy_from_slice(&src_page[src_start..src_start + len]);
            dst_page[dst_start + len] = byte;
        }
        dst
    }

    /// Rewinds to the first page without releasing memory
    pub fn reset(&mut self) {
        self.current = 0;
        self.used = 0;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn pages_pair(pages: &mut [Vec<u8>], src: usize, dst: usize) -> (&Vec<u8>, &mut Vec<u8>) {
    if src < dst {
        let (lo, hi) = pages.split_at_mut(dst);
        (&lo[src], &mut hi[0])
    } else {
        let (lo, hi) = pages.split_at_mut(src);
        (&hi[0], &mut lo[dst])
    }
}

/// The LZW string table
#[derive(Debug)]
pub struct Dictionary {
    arena: PagedArena,
    entries: Vec<Span>,
}

impl Dictionary {
    /// Creates a table already seeded with the 256 single-byte strings
    pub fn new(page_size: usize) -> Self {
        let mut dictionary = Dictionary {
            arena: PagedArena::new(page_size),
            entries: Vec::with_capacity(MAX_ENTRIES),
        };
        dictionary.reset();
        dictionary
    }

    /// Drops every multi-byte entry and re-seeds the single-byte strings
    pub fn reset(&mut self) {
        self.arena.reset();
        self.entries.clear();

        let literals = self.arena.alloc(256);
        for (i, b) in self.arena.bytes_mut(literals).iter_mut().enumerate() {
            *b = i as u8;
        }
        self.entries.extend((0..256u32).map(|i| Span {
            page: literals.page,
            start: literals.start + i,
            len: 1,
        }));

        // Clear and end-of-information codes own no string
        let reserved = Span { page: literals.page, start: literals.start, len: 0 };
        self.entries.resize(FIRST_FREE_CODE, reserved);
    }

    /// Number of codes assigned so far, which is also the next free code
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_ENTRIES
    }

    pub fn get(&self, code: usize) -> Option<&[u8]> {
        self.entries.get(code).map(|&span| self.arena.bytes(span))
    }

    /// Adds the string of `prefix` followed by `byte`, returning its code
    pub fn add_extended(&mut self, prefix: usize, byte: u8) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let src = *self.entries.get(prefix)?;
        let span = self.arena.alloc_extended(src, byte);
        self.entries.push(span);
        Some(self.entries.len() - 1)
    }

    pub fn page_count(&self) -> usize {
        self.arena.page_count()
    }
}
