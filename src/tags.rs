use std::collections::{BTreeMap, HashSet};

use crate::time_entry::TimeEntry;

/// タグごとに、そのタグを含む記録の件数を集計する。
///
/// 件数は記録単位で数える。1件の記録の中に同じタグが複数あっても1回として数える。
/// タグは大文字小文字を区別し、結果はタグ名の辞書順(昇順)で返す。
pub fn tag_counts(entries: &[TimeEntry]) -> Vec<(String, usize)> {
    let counts: BTreeMap<String, usize> = entries.iter().fold(BTreeMap::new(), |mut acc, entry| {
        let unique: HashSet<&String> = entry.tags.iter().collect();
        unique.into_iter().for_each(|tag| {
            *acc.entry(tag.clone()).or_insert(0) += 1;
        });
        acc
    });

    counts.into_iter().collect()
}
