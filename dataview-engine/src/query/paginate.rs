//! Page slicing over the flattened bucket order.

use dataview_views::Pagination;

use super::group::Bucket;

/// Slice `buckets` to the page window described by `pagination`.
///
/// The window is taken over the concatenation of all buckets, then the
/// surviving records are re-bucketed under their original keys. Buckets with
/// nothing on the page are dropped, except the single `""` bucket of an
/// ungrouped result, which is always present. The returned pagination carries
/// the post-filter total and a page clamped into range.
pub fn apply<'a>(buckets: &[Bucket<'a>], pagination: Pagination) -> (Vec<Bucket<'a>>, Pagination) {
    let total = buckets.iter().map(Bucket::len).sum();
    let pagination = pagination.with_total(total);

    let start = pagination.offset();
    let end = start.saturating_add(pagination.page_size);

    let mut paged = Vec::new();
    let mut position = 0;
    for bucket in buckets {
        let bucket_start = position;
        let bucket_end = position + bucket.len();
        position = bucket_end;

        let lo = start.max(bucket_start);
        let hi = end.min(bucket_end);
        if lo >= hi {
            continue;
        }
        paged.push(Bucket {
            key: bucket.key.clone(),
            records: bucket.records[lo - bucket_start..hi - bucket_start].to_vec(),
            collapsed: bucket.collapsed,
        });
    }

    if let [only] = buckets {
        if only.key.is_empty() && paged.is_empty() {
            paged.push(Bucket {
                key: String::new(),
                records: Vec::new(),
                collapsed: only.collapsed,
            });
        }
    }

    (paged, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_fields::Record;

    fn records(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new(format!("r{i}"))).collect()
    }

    #[test]
    fn window_spans_buckets() {
        let records = records(7);
        let refs: Vec<&Record> = records.iter().collect();
        let buckets = vec![
            Bucket::new("a", refs[..3].to_vec()),
            Bucket::new("b", refs[3..].to_vec()),
        ];
        let (paged, pagination) = apply(
            &buckets,
            Pagination {
                page: 2,
                page_size: 2,
                total: 0,
            },
        );
        assert_eq!(pagination.total, 7);
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[0].key, "a");
        assert_eq!(paged[0].records[0].id, "r2");
        assert_eq!(paged[1].key, "b");
        assert_eq!(paged[1].records[0].id, "r3");
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let (paged, pagination) = apply(
            &[Bucket::new("", Vec::new())],
            Pagination {
                page: 5,
                page_size: 10,
                total: 0,
            },
        );
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.total, 0);
        assert_eq!(paged.len(), 1);
        assert!(paged[0].is_empty());
    }

    #[test]
    fn empty_ungrouped_result_keeps_one_bucket() {
        let (paged, _) = apply(&[Bucket::new("", Vec::new())], Pagination::new(25));
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].key, "");
        assert!(paged[0].records.is_empty());
    }

    #[test]
    fn empty_grouped_buckets_are_dropped() {
        let records = records(2);
        let refs: Vec<&Record> = records.iter().collect();
        let (paged, pagination) = apply(
            &[Bucket::new("a", refs), Bucket::new("b", Vec::new())],
            Pagination::new(10),
        );
        assert_eq!(pagination.total, 2);
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].key, "a");
    }

    #[test]
    fn last_page_is_partial() {
        let records = records(25);
        let refs: Vec<&Record> = records.iter().collect();
        let (paged, pagination) = apply(
            &[Bucket::new("", refs)],
            Pagination {
                page: 3,
                page_size: 10,
                total: 0,
            },
        );
        assert_eq!(pagination.page_count(), 3);
        assert_eq!(paged[0].len(), 5);
        assert_eq!(paged[0].records[0].id, "r20");
    }
}
