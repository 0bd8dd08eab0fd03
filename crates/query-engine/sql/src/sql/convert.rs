//! Convert a SQL AST to a fragment.

use super::ast::{
    Fragment, From, GroupBy, Having, Join, JoinKind, Limit, OrderBy, OrderByDirection, Select,
    SelectList, TableAlias, TableSource, Where,
};
use super::helpers;

impl Select {
    pub fn to_sql(&self, sql: &mut Fragment) {
        sql.append_syntax("SELECT ");

        self.select_list.to_sql(sql);

        if let Some(from) = &self.from {
            from.to_sql(sql);
        }

        for join in &self.joins {
            sql.append_syntax(" ");
            sql.append_fragment(join);
        }

        if let Some(where_) = &self.where_ {
            where_.to_sql(sql);
        }

        self.group_by.to_sql(sql);

        if let Some(having) = &self.having {
            having.to_sql(sql);
        }

        if let Some(order_by) = &self.order_by {
            order_by.to_sql(sql);
        }

        self.limit.to_sql(sql);
    }
}

impl SelectList {
    pub fn to_sql(&self, sql: &mut Fragment) {
        if let Some(distinct) = &self.distinct {
            sql.append_fragment(distinct);
            if !self.items.is_empty() {
                sql.append_syntax(", ");
            }
        } else if self.items.is_empty() {
            sql.append_syntax("*");
        }
        comma_separated(sql, &self.items);
    }
}

impl TableSource {
    pub fn to_sql(&self, sql: &mut Fragment) {
        match self {
            TableSource::Table { name, alias } => {
                sql.append_identifier(name);
                if let Some(alias) = alias {
                    sql.append_syntax(" AS ");
                    alias.to_sql(sql);
                }
            }
            TableSource::Subquery { query, alias } => {
                sql.append_syntax("(");
                sql.append_fragment(query);
                sql.append_syntax(")");
                if let Some(alias) = alias {
                    sql.append_syntax(" AS ");
                    alias.to_sql(sql);
                }
            }
        }
    }
}

impl From {
    pub fn to_sql(&self, sql: &mut Fragment) {
        sql.append_syntax(" FROM ");
        self.0.to_sql(sql);
    }
}

impl Join {
    pub fn to_sql(&self, sql: &mut Fragment) {
        self.kind.to_sql(sql);
        sql.append_syntax(" ");
        self.source.to_sql(sql);
        if let Some(on) = &self.on {
            sql.append_syntax(" ON ");
            sql.append_fragment(on);
        }
    }
}

impl JoinKind {
    pub fn to_sql(self, sql: &mut Fragment) {
        match self {
            JoinKind::Inner => sql.append_syntax("INNER JOIN"),
            JoinKind::LeftOuter => sql.append_syntax("LEFT JOIN"),
            JoinKind::RightOuter => sql.append_syntax("RIGHT JOIN"),
            JoinKind::FullOuter => sql.append_syntax("FULL OUTER JOIN"),
            JoinKind::Cross => sql.append_syntax("CROSS JOIN"),
        }
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut Fragment) {
        let Where(expression) = self;
        sql.append_syntax(" WHERE ");
        sql.append_fragment(expression);
    }
}

impl GroupBy {
    pub fn to_sql(&self, sql: &mut Fragment) {
        if !self.elements.is_empty() {
            sql.append_syntax(" GROUP BY ");
            comma_separated(sql, &self.elements);
        }
    }
}

impl Having {
    pub fn to_sql(&self, sql: &mut Fragment) {
        let Having(expression) = self;
        sql.append_syntax(" HAVING ");
        sql.append_fragment(expression);
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut Fragment) {
        let OrderBy(elements) = self;
        if !elements.is_empty() {
            sql.append_syntax(" ORDER BY ");
            sql.append_fragment(elements);
        }
    }
}

impl OrderByDirection {
    pub fn to_sql(self, sql: &mut Fragment) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}

impl Limit {
    pub fn to_sql(&self, sql: &mut Fragment) {
        if let Some(limit) = self.limit {
            sql.append_syntax(" LIMIT ");
            sql.append_syntax(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            sql.append_syntax(" OFFSET ");
            sql.append_syntax(&offset.to_string());
        }
    }
}

impl TableAlias {
    pub fn to_sql(&self, sql: &mut Fragment) {
        sql.append_alias(&self.name);
    }
}

fn comma_separated(sql: &mut Fragment, elements: &[Fragment]) {
    sql.append_fragment(&helpers::join_fragments(elements, ", "));
}
