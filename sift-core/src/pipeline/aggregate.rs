//! Per-restaurant aggregation.

use std::collections::BTreeMap;

use crate::analyzer::TermCounts;
use crate::pipeline::processor::TokenizedDocument;
use crate::{DocId, Document, GroupId};

/// Which documents belong to which restaurant.
///
/// Groups iterate in ascending id order and members are kept sorted and
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMembership {
    groups: BTreeMap<GroupId, Vec<DocId>>,
}

impl GroupMembership {
    /// Creates an empty membership.
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership of every document in `documents`.
    pub fn from_documents<'d, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'d Document>,
    {
        let mut membership = Self::new();
        for doc in documents {
            membership.insert(doc.group_id, doc.id);
        }
        membership
    }

    /// Adds `doc_id` to `group_id`. Adding the same pair twice is a no-op.
    pub fn insert(&mut self, group_id: GroupId, doc_id: DocId) {
        let members = self.groups.entry(group_id).or_default();
        if let Err(pos) = members.binary_search(&doc_id) {
            members.insert(pos, doc_id);
        }
    }

    /// Members of `group_id`, ascending.
    pub fn members(&self, group_id: GroupId) -> Option<&[DocId]> {
        self.groups.get(&group_id).map(Vec::as_slice)
    }

    /// Groups in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[DocId])> {
        self.groups.iter().map(|(&g, m)| (g, m.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when no document has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Merged statistics of one restaurant's tokenized reviews.
///
/// `joined_documents[i]` is the cleaned text of review `contributing_ids[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantAggregate {
    /// Restaurant the reviews belong to.
    pub group_id: GroupId,
    /// Sum of the per-review term counts.
    pub counts: TermCounts,
    /// Cleaned text of each contributing review.
    pub joined_documents: Vec<String>,
    /// Contributing review ids, ascending.
    pub contributing_ids: Vec<DocId>,
}

impl RestaurantAggregate {
    /// Creates an aggregate with no reviews.
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            ..Default::default()
        }
    }

    /// Folds one tokenized review into the aggregate.
    pub fn push(&mut self, doc: &TokenizedDocument) {
        self.counts.merge(&doc.counts);
        self.joined_documents.push(doc.joined());
        self.contributing_ids.push(doc.doc_id);
    }

    /// Number of contributing reviews.
    pub fn len(&self) -> usize {
        self.contributing_ids.len()
    }

    /// Returns `true` when no review contributed.
    pub fn is_empty(&self) -> bool {
        self.contributing_ids.is_empty()
    }
}

/// Builds one aggregate per group of `membership`.
///
/// Members with no entry in `tokenized` (filtered out or never reached
/// because of an early stop) are skipped. A group whose members are all
/// missing still gets an empty aggregate.
pub fn aggregate(
    tokenized: &BTreeMap<DocId, TokenizedDocument>,
    membership: &GroupMembership,
) -> BTreeMap<GroupId, RestaurantAggregate> {
    membership
        .iter()
        .map(|(group_id, members)| {
            let mut agg = RestaurantAggregate::new(group_id);
            for doc in members.iter().filter_map(|id| tokenized.get(id)) {
                agg.push(doc);
            }
            (group_id, agg)
        })
        .collect()
}
