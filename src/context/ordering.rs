//! ORDER BY and GROUP BY entries.

use smol_str::SmolStr;

/// Sort direction; ascending unless `DESC` is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderByItem {
    /// `ORDER BY 2`: a 1-based reference into the projection list.
    ByPosition {
        index: usize,
        direction: OrderDirection,
    },
    /// `ORDER BY name` or `ORDER BY o.name`.
    ByName {
        owner: Option<SmolStr>,
        name: SmolStr,
        direction: OrderDirection,
        /// Projection alias the merge layer reads the value from.
        alias: Option<SmolStr>,
    },
}

impl OrderByItem {
    pub fn direction(&self) -> OrderDirection {
        match self {
            OrderByItem::ByPosition { direction, .. } | OrderByItem::ByName { direction, .. } => {
                *direction
            }
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            OrderByItem::ByName { alias, .. } => alias.as_deref(),
            OrderByItem::ByPosition { .. } => None,
        }
    }

    /// `owner.name` or `name`; `None` for positional entries.
    pub fn qualified_name(&self) -> Option<SmolStr> {
        match self {
            OrderByItem::ByName { owner, name, .. } => Some(qualify(owner.as_deref(), name)),
            OrderByItem::ByPosition { .. } => None,
        }
    }
}

/// One GROUP BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupByItem {
    pub owner: Option<SmolStr>,
    pub name: SmolStr,
    pub direction: OrderDirection,
    pub alias: Option<SmolStr>,
}

impl GroupByItem {
    /// `owner.name` or `name`.
    pub fn qualified_name(&self) -> SmolStr {
        qualify(self.owner.as_deref(), &self.name)
    }
}

pub(crate) fn qualify(owner: Option<&str>, name: &str) -> SmolStr {
    match owner {
        Some(owner) => smol_str::format_smolstr!("{owner}.{name}"),
        None => SmolStr::new(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_names() {
        let by_name = OrderByItem::ByName {
            owner: Some("o".into()),
            name: "user_id".into(),
            direction: OrderDirection::Desc,
            alias: None,
        };
        assert_eq!(by_name.qualified_name().as_deref(), Some("o.user_id"));
        assert_eq!(by_name.direction(), OrderDirection::Desc);

        let group = GroupByItem {
            owner: None,
            name: "status".into(),
            direction: OrderDirection::default(),
            alias: Some("sharding_gen_1".into()),
        };
        assert_eq!(group.qualified_name(), "status");
        assert_eq!(group.direction, OrderDirection::Asc);
    }

    #[test]
    fn positional_entries_have_no_name() {
        let item = OrderByItem::ByPosition {
            index: 2,
            direction: OrderDirection::Asc,
        };
        assert!(item.qualified_name().is_none());
        assert!(item.alias().is_none());
    }
}
