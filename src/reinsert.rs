//! The three-pass tag reinserter: rebuilding the target-side markup that the
//! translator and aligner never saw, since both operate on lossy views.

use std::collections::{HashMap, HashSet};

use crate::error::{MarkupError, MarkupResult};
use crate::segment::{Segment, SegmentId};
use crate::segmented_text::SegmentedText;

use crate::aligned_segments::AlignedSegments;

struct PendingTag {
    index: usize,
    depth: usize,
    is_closing: bool,
    segment: Segment,
}

fn line_boundaries(text: &SegmentedText) -> Vec<isize> {
    let mut bounds = vec![-1isize];
    for (i, seg) in text.iter().enumerate() {
        if seg.is_newline() {
            bounds.push(i as isize);
        }
    }
    bounds.push(text.len() as isize);
    bounds
}

fn line_index_of(bounds: &[isize], pos: usize) -> usize {
    bounds
        .iter()
        .position(|&b| b >= pos as isize)
        .expect("line boundaries always end past the last index")
}

impl AlignedSegments {
    /// Reestablishes paired-tag scope on the target side: for each opening
    /// tag, the target span covering everything aligned to content inside it
    /// is bracketed by a copy of the opening and closing tag.
    pub fn reinsert_tags(&mut self) -> MarkupResult<()> {
        let src_segments: Vec<Segment> = self.src.iter().cloned().collect();
        let src_bounds = line_boundaries(&self.src);
        let tgt_bounds = line_boundaries(&self.tgt);
        let tgt_index = self.tgt.position_index();
        let tgt_snapshot: Vec<Segment> = self.tgt.iter().cloned().collect();

        let mut stack: Vec<(usize, usize)> = Vec::new(); // (src_index, depth)
        let mut pairs: Vec<(usize, usize, usize)> = Vec::new(); // (opening_index, closing_index, depth)
        let mut tag_to_tgt: HashMap<usize, HashSet<usize>> = HashMap::new();

        for (i, seg) in src_segments.iter().enumerate() {
            if seg.is_newline() && !stack.is_empty() {
                return Err(MarkupError::TagSpansNewline);
            }
            if seg.is_paired_tag() {
                if seg.is_paired_opening() {
                    stack.push((i, stack.len()));
                } else {
                    let (opening_i, depth) = stack
                        .pop()
                        .ok_or_else(|| MarkupError::MalformedTagNesting(seg.surface().to_string()))?;
                    pairs.push((opening_i, i, depth));
                }
                continue;
            }
            if !stack.is_empty() {
                let tgt_ids = self.alignment.get(seg.id());
                if !tgt_ids.is_empty() {
                    let indices: Vec<usize> = tgt_ids.iter().filter_map(|id| tgt_index.get(id).copied()).collect();
                    for &(opening_i, _) in &stack {
                        tag_to_tgt.entry(opening_i).or_default().extend(indices.iter().copied());
                    }
                }
            }
        }
        if !stack.is_empty() {
            return Err(MarkupError::MalformedTagNesting("unclosed paired tag".to_string()));
        }

        let mut pending = Vec::new();
        for (opening_i, closing_i, depth) in pairs {
            let Some(covered) = tag_to_tgt.get(&opening_i) else {
                continue;
            };
            if covered.is_empty() {
                continue;
            }
            let mut lo = *covered.iter().min().unwrap();
            let mut hi = *covered.iter().max().unwrap();

            let line_idx = line_index_of(&src_bounds, opening_i);
            let left_bound = (src_bounds[line_idx - 1] + 1) as usize;
            let right_bound = src_bounds[line_idx] as usize;
            let text_in_line: Vec<usize> = (left_bound..right_bound).filter(|&i| src_segments[i].is_text()).collect();
            if let (Some(&first_text), Some(&last_text)) = (text_in_line.iter().min(), text_in_line.iter().max()) {
                if opening_i <= first_text && closing_i >= last_text {
                    let tgt_left = (tgt_bounds[line_idx - 1] + 1) as usize;
                    let tgt_right = tgt_bounds[line_idx] as usize;
                    let tgt_text: Vec<usize> = (tgt_left..tgt_right.min(tgt_snapshot.len()))
                        .filter(|&i| tgt_snapshot[i].is_text())
                        .collect();
                    if let (Some(&tfirst), Some(&tlast)) = (tgt_text.iter().min(), tgt_text.iter().max()) {
                        lo = lo.min(tfirst);
                        hi = hi.max(tlast);
                    }
                }
            }

            pending.push(PendingTag {
                index: lo,
                depth,
                is_closing: false,
                segment: src_segments[opening_i].clone(),
            });
            pending.push(PendingTag {
                index: hi + 1,
                depth,
                is_closing: true,
                segment: src_segments[closing_i].clone(),
            });
        }

        pending.sort_by_key(|p| {
            let secondary = if p.is_closing { -(p.depth as i64) } else { p.depth as i64 };
            (p.index, p.is_closing, secondary)
        });

        let mut offset = 0usize;
        for p in pending {
            let id = p.segment.id();
            self.tgt.insert(p.index + offset, p.segment);
            self.alignment.add(id, id);
            offset += 1;
        }

        Ok(())
    }

    /// Restores whitespace surfaces flattened to a single space by the
    /// translator view: a src whitespace segment singly aligned to a target
    /// whitespace segment overwrites it in place, carrying its own identity.
    pub fn reinsert_whitespace(&mut self) {
        let candidates: Vec<(Segment, SegmentId)> = self
            .src
            .iter()
            .filter(|seg| seg.is_whitespace())
            .filter_map(|seg| {
                let tgts = self.alignment.get(seg.id());
                if tgts.len() == 1 {
                    Some((seg.clone(), tgts[0]))
                } else {
                    None
                }
            })
            .collect();

        for (src_seg, tgt_id) in candidates {
            let Some(pos) = self.tgt.position_of(tgt_id) else {
                continue;
            };
            self.alignment.remove(src_seg.id(), tgt_id).ok();
            self.tgt.segments_mut()[pos] = src_seg.clone();
            self.alignment.add(src_seg.id(), src_seg.id());
        }
    }

    /// Reinserts src segments that carry no alignment at all and are either a
    /// placeholder tag or non-normalized whitespace, at the best non-crossing
    /// position available.
    pub fn reinsert_segments(&mut self) {
        let rightmost = self.rightmost_alignment_by_src();
        let leftmost = self.leftmost_alignment_by_src();
        let src_segments: Vec<Segment> = self.src.iter().cloned().collect();

        let mut insertions: Vec<(usize, Segment)> = Vec::new();
        for (i, seg) in src_segments.iter().enumerate() {
            if seg.is_paired_tag() || self.alignment.is_src_aligned(seg.id()) {
                continue;
            }
            let should_reinsert = seg.is_tag() || (seg.is_whitespace() && seg.surface() != " " && seg.surface() != "\n");
            if !should_reinsert {
                continue;
            }
            let r = rightmost[i];
            let l = leftmost[i];
            if r >= l {
                log::warn!("no non-crossing insertion point for src index {i}; inserting at {l} anyway");
            }
            insertions.push((l.max(0) as usize, seg.clone()));
        }

        insertions.sort_by_key(|(idx, _)| *idx);
        let mut offset = 0usize;
        for (idx, seg) in insertions {
            let id = seg.id();
            self.tgt.insert(idx + offset, seg);
            self.alignment.add(id, id);
            offset += 1;
        }
    }
}
