use sea_orm_migration::prelude::*;

pub(crate) fn serial_primary_key<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .take()
}

pub(crate) fn text<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).text().not_null().take()
}

pub(crate) fn text_null<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).text().null().take()
}

pub(crate) fn date<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).date().not_null().take()
}

pub(crate) fn date_null<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).date().null().take()
}

pub(crate) fn reference<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).integer().not_null().take()
}

pub(crate) fn reference_null<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).integer().null().take()
}

/// `timestamptz` defaulting to the insertion time.
pub(crate) fn timestamp_now<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident)
        .timestamp_with_time_zone()
        .default(Expr::current_timestamp())
        .take()
}
