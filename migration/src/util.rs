use sea_orm_migration::prelude::*;

/// Table with a serial integer primary key named `id`
pub(crate) fn serial_table_statement<T: IntoIden, I: IntoIden>(table: T, id: I) -> TableCreateStatement {
    TableCreateStatement::new()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id)
            .integer()
            .not_null()
            .auto_increment()
            .primary_key()
            .take())
        .take()
}

/// Appends the audit columns shared by every workflow table.
///
/// `fecha_creacion` is filled by the application in fund time, the default
/// only covers manual inserts.
pub(crate) fn with_audit_columns(mut statement: TableCreateStatement) -> TableCreateStatement {
    statement
        .col(ColumnDef::new(AuditColumn::UsuarioCreacion)
            .text())
        .col(ColumnDef::new(AuditColumn::FechaCreacion)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp()))
        .col(ColumnDef::new(AuditColumn::UsuarioModificacion)
            .text())
        .col(ColumnDef::new(AuditColumn::FechaModificacion)
            .timestamp_with_time_zone())
        .take()
}

/// Appends one worker line, identical for regular and additional payrolls
pub(crate) fn with_worker_columns(mut statement: TableCreateStatement) -> TableCreateStatement {
    statement
        .col(ColumnDef::new(WorkerColumn::Nro).integer().not_null())
        .col(ColumnDef::new(WorkerColumn::Ci).text().not_null())
        .col(ColumnDef::new(WorkerColumn::ApellidoPaterno).text().not_null())
        .col(ColumnDef::new(WorkerColumn::ApellidoMaterno).text().not_null().default(""))
        .col(ColumnDef::new(WorkerColumn::Nombres).text().not_null())
        .col(ColumnDef::new(WorkerColumn::Sexo).text().not_null())
        .col(ColumnDef::new(WorkerColumn::Cargo).text().not_null())
        .col(ColumnDef::new(WorkerColumn::FechaNac).date().not_null())
        .col(ColumnDef::new(WorkerColumn::FechaIngreso).date().not_null())
        .col(ColumnDef::new(WorkerColumn::FechaRetiro).date())
        .col(ColumnDef::new(WorkerColumn::DiasPagados).integer().not_null())
        .col(ColumnDef::new(WorkerColumn::HaberBasico).double().not_null())
        .col(ColumnDef::new(WorkerColumn::BonoAntiguedad).double().not_null().default(0.0))
        .col(ColumnDef::new(WorkerColumn::MontoHorasExtra).double().not_null().default(0.0))
        .col(ColumnDef::new(WorkerColumn::MontoHorasExtraNocturnas).double().not_null().default(0.0))
        .col(ColumnDef::new(WorkerColumn::OtrosBonosPagos).double().not_null().default(0.0))
        .col(ColumnDef::new(WorkerColumn::Salario).double().not_null())
        .col(ColumnDef::new(WorkerColumn::Regional).text().not_null())
        .take()
}

/// Child rows follow their parent on update and delete
pub(crate) async fn create_cascade_fk<C, P>(
    manager: &SchemaManager<'_>,
    child: C,
    column: &'static str,
    parent: P,
    parent_column: &'static str,
) -> Result<(), DbErr>
where
    C: IntoIden + 'static,
    P: IntoIden + 'static,
{
    manager.create_foreign_key(ForeignKeyCreateStatement::new()
        .from(child, Alias::new(column))
        .to(parent, Alias::new(parent_column))
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .take()
    ).await
}

#[derive(DeriveIden)]
pub(crate) enum AuditColumn {
    UsuarioCreacion,
    FechaCreacion,
    UsuarioModificacion,
    FechaModificacion,
}

#[derive(DeriveIden)]
pub(crate) enum WorkerColumn {
    Nro,
    Ci,
    ApellidoPaterno,
    ApellidoMaterno,
    Nombres,
    Sexo,
    Cargo,
    FechaNac,
    FechaIngreso,
    FechaRetiro,
    DiasPagados,
    HaberBasico,
    BonoAntiguedad,
    MontoHorasExtra,
    MontoHorasExtraNocturnas,
    OtrosBonosPagos,
    Salario,
    Regional,
}
