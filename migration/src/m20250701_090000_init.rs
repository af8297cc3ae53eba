use sea_orm_migration::prelude::*;

use crate::util::{create_cascade_fk, serial_table_statement, with_audit_columns, with_worker_columns, WorkerColumn};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(with_audit_columns(serial_table_statement(PlanillasAportes::Table, PlanillasAportes::IdPlanillaAportes))
                .col(ColumnDef::new(PlanillasAportes::ComNro)
                    .integer())
                .col(ColumnDef::new(PlanillasAportes::CodPatronal)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PlanillasAportes::Empresa)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PlanillasAportes::TipoEmpresa)
                    .text()
                    .not_null()) // `AP` or `AV`
                .col(ColumnDef::new(PlanillasAportes::FechaPlanilla)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PlanillasAportes::TotalImporte)
                    .double()
                    .not_null())
                .col(ColumnDef::new(PlanillasAportes::TotalTrabaj)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(PlanillasAportes::Estado)
                    .small_integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(PlanillasAportes::Observaciones)
                    .text())
                .col(ColumnDef::new(PlanillasAportes::FechaDeclarada)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(PlanillasAportes::FechaPago)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(PlanillasAportes::AportePorcentaje).double())
                .col(ColumnDef::new(PlanillasAportes::UfvDiaFormal).double())
                .col(ColumnDef::new(PlanillasAportes::UfvDiaPresentacion).double())
                .col(ColumnDef::new(PlanillasAportes::AporteActualizado).double())
                .col(ColumnDef::new(PlanillasAportes::MontoActualizado).double())
                .col(ColumnDef::new(PlanillasAportes::MultaNoPresentacion).double())
                .col(ColumnDef::new(PlanillasAportes::DiasRetraso).integer())
                .col(ColumnDef::new(PlanillasAportes::Intereses).double())
                .col(ColumnDef::new(PlanillasAportes::MultaSobreIntereses).double())
                .col(ColumnDef::new(PlanillasAportes::TotalACancelarParcial).double())
                .col(ColumnDef::new(PlanillasAportes::TotalMultas).double())
                .col(ColumnDef::new(PlanillasAportes::TotalTasaInteres).double())
                .col(ColumnDef::new(PlanillasAportes::TotalAportesAsuss).double())
                .col(ColumnDef::new(PlanillasAportes::TotalAportesMinSalud).double())
                .col(ColumnDef::new(PlanillasAportes::TotalACancelar).double())
                .take()
            ).await?;

        // One payroll per employer and month
        manager
            .create_index(Index::create()
                .name("idx_planillas_aportes_periodo")
                .table(PlanillasAportes::Table)
                .col(PlanillasAportes::CodPatronal)
                .col(PlanillasAportes::FechaPlanilla)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(with_worker_columns(serial_table_statement(PlanillaAportesDetalles::Table, PlanillaAportesDetalles::IdPlanillaAportesDetalles))
                .col(ColumnDef::new(PlanillaAportesDetalles::IdPlanillaAportes)
                    .integer()
                    .not_null())
                .take()
            ).await?;
        create_cascade_fk(manager, PlanillaAportesDetalles::Table, "id_planilla_aportes", PlanillasAportes::Table, "id_planilla_aportes").await?;

        manager
            .create_index(Index::create()
                .name("idx_planilla_aportes_detalles_ci")
                .table(PlanillaAportesDetalles::Table)
                .col(PlanillaAportesDetalles::IdPlanillaAportes)
                .col(WorkerColumn::Ci)
                .take()
            ).await?;

        manager
            .create_table(with_audit_columns(serial_table_statement(PlanillasAdicionales::Table, PlanillasAdicionales::IdPlanillaAdicional))
                .col(ColumnDef::new(PlanillasAdicionales::IdPlanillaAportes)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(PlanillasAdicionales::TotalImporte)
                    .double()
                    .not_null())
                .col(ColumnDef::new(PlanillasAdicionales::TotalTrabaj)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(PlanillasAdicionales::Estado)
                    .small_integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(PlanillasAdicionales::Observaciones)
                    .text())
                .col(ColumnDef::new(PlanillasAdicionales::MotivoAdicional)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PlanillasAdicionales::FechaDeclarada)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        create_cascade_fk(manager, PlanillasAdicionales::Table, "id_planilla_aportes", PlanillasAportes::Table, "id_planilla_aportes").await?;

        manager
            .create_table(with_worker_columns(serial_table_statement(PlanillaAdicionalDetalles::Table, PlanillaAdicionalDetalles::IdPlanillaAdicionalDetalles))
                .col(ColumnDef::new(PlanillaAdicionalDetalles::IdPlanillaAdicional)
                    .integer()
                    .not_null())
                .take()
            ).await?;
        create_cascade_fk(manager, PlanillaAdicionalDetalles::Table, "id_planilla_adicional", PlanillasAdicionales::Table, "id_planilla_adicional").await?;

        manager
            .create_table(serial_table_statement(PagosAportes::Table, PagosAportes::IdPago)
                .col(ColumnDef::new(PagosAportes::IdPlanillaAportes)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(PagosAportes::FechaPago)
                    .timestamp_with_time_zone()
                    .not_null())
                .col(ColumnDef::new(PagosAportes::MontoPagado)
                    .double()
                    .not_null())
                .col(ColumnDef::new(PagosAportes::Observaciones)
                    .text())
                .col(ColumnDef::new(PagosAportes::UsuarioCreacion)
                    .text())
                .col(ColumnDef::new(PagosAportes::FechaCreacion)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()))
                .take()
            ).await?;
        create_cascade_fk(manager, PagosAportes::Table, "id_planilla_aportes", PlanillasAportes::Table, "id_planilla_aportes").await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(
            TableDropStatement::new()
                .table(PagosAportes::Table)
                .take()
        ).await?;

        manager.drop_table(
            TableDropStatement::new()
                .table(PlanillaAdicionalDetalles::Table)
                .take()
        ).await?;

        manager.drop_table(
            TableDropStatement::new()
                .table(PlanillasAdicionales::Table)
                .take()
        ).await?;

        manager.drop_table(
            TableDropStatement::new()
                .table(PlanillaAportesDetalles::Table)
                .take()
        ).await?;

        manager.drop_table(
            TableDropStatement::new()
                .table(PlanillasAportes::Table)
                .take()
        ).await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PlanillasAportes {
    Table,
    IdPlanillaAportes,
    ComNro,
    CodPatronal,
    Empresa,
    TipoEmpresa,
    FechaPlanilla,
    TotalImporte,
    TotalTrabaj,
    Estado,
    Observaciones,
    FechaDeclarada,
    FechaPago,
    AportePorcentaje,
    UfvDiaFormal,
    UfvDiaPresentacion,
    AporteActualizado,
    MontoActualizado,
    MultaNoPresentacion,
    DiasRetraso,
    Intereses,
    MultaSobreIntereses,
    #[sea_orm(iden = "total_a_cancelar_parcial")]
    TotalACancelarParcial,
    TotalMultas,
    TotalTasaInteres,
    TotalAportesAsuss,
    TotalAportesMinSalud,
    #[sea_orm(iden = "total_a_cancelar")]
    TotalACancelar,
}

#[derive(DeriveIden)]
enum PlanillaAportesDetalles {
    Table,
    IdPlanillaAportesDetalles,
    IdPlanillaAportes,
}

#[derive(DeriveIden)]
enum PlanillasAdicionales {
    Table,
    IdPlanillaAdicional,
    IdPlanillaAportes,
    TotalImporte,
    TotalTrabaj,
    Estado,
    Observaciones,
    MotivoAdicional,
    FechaDeclarada,
}

#[derive(DeriveIden)]
enum PlanillaAdicionalDetalles {
    Table,
    IdPlanillaAdicionalDetalles,
    IdPlanillaAdicional,
}

#[derive(DeriveIden)]
enum PagosAportes {
    Table,
    IdPago,
    IdPlanillaAportes,
    FechaPago,
    MontoPagado,
    Observaciones,
    UsuarioCreacion,
    FechaCreacion,
}
