#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PaginationParams {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self { limit, offset }
    }

    /// Appends `LIMIT`/`OFFSET` placeholders numbered after the
    /// `existing_param_count` parameters the base query already binds.
    pub fn build_query_with_existing_params(
        &self, base_query: &str, order_by: &str, existing_param_count: usize,
    ) -> (String, Vec<i64>) {
        let mut query = format!("{base_query} {order_by}");
        let mut params = Vec::new();
        let mut param_count = existing_param_count;

        if let Some(limit) = self.limit {
            param_count += 1;
            query.push_str(&format!(" LIMIT ${param_count}"));
            params.push(clamp(limit));
        }
        if let Some(offset) = self.offset {
            param_count += 1;
            query.push_str(&format!(" OFFSET ${param_count}"));
            params.push(clamp(offset));
        }

        (query, params)
    }

    /// Same window applied to an in-memory, already ordered slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self
            .offset
            .map_or(0, |offset| usize::try_from(offset).unwrap_or(usize::MAX))
            .min(items.len());
        let rest = &items[start..];
        let len = self
            .limit
            .map_or(rest.len(), |limit| {
                usize::try_from(limit).unwrap_or(usize::MAX)
            })
            .min(rest.len());
        &rest[..len]
    }
}

fn clamp(value: u64) -> i64 { i64::try_from(value).unwrap_or(i64::MAX) }
