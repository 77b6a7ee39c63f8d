//! Migration: Reject dependency edges that would close a cycle
//!
//! The database owns the complete dependency graph, so cycle detection
//! lives here rather than in the client: a BEFORE INSERT trigger walks the
//! edges reachable from the new edge's target and raises when the walk
//! reaches the new edge's source. Clients map the raised message to a
//! conflict error.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE OR REPLACE FUNCTION reject_dependency_cycles()
                RETURNS TRIGGER AS $$
                BEGIN
                    IF NEW.deliverable_id = NEW.depends_on_id THEN
                        RAISE EXCEPTION 'A deliverable cannot depend on itself';
                    END IF;

                    IF EXISTS (
                        WITH RECURSIVE reachable(id) AS (
                            SELECT NEW.depends_on_id
                            UNION
                            SELECT d.depends_on_id
                            FROM deliverable_dependencies d
                            JOIN reachable r ON d.deliverable_id = r.id
                        )
                        SELECT 1 FROM reachable WHERE id = NEW.deliverable_id
                    ) THEN
                        RAISE EXCEPTION 'circular dependency detected between % and %',
                            NEW.deliverable_id, NEW.depends_on_id;
                    END IF;

                    RETURN NEW;
                END;
                $$ language 'plpgsql';
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS deliverable_dependencies_no_cycles ON deliverable_dependencies; CREATE \
                 TRIGGER deliverable_dependencies_no_cycles BEFORE INSERT ON deliverable_dependencies FOR EACH ROW \
                 EXECUTE FUNCTION reject_dependency_cycles()",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS deliverable_dependencies_no_cycles ON deliverable_dependencies")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS reject_dependency_cycles()")
            .await?;

        Ok(())
    }
}
