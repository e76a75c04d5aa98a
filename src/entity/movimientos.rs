use sea_orm::entity::prelude::*;

/// Los movimientos son inmutables: solo se insertan, nunca se actualizan ni
/// se borran desde la API.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movimientos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tipo: String,
    pub producto_id: Option<i32>,
    pub cantidad: i32,
    pub responsable_id: Option<i32>,
    pub referencia: String,
    pub notas: String,
    pub fecha_movimiento: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::productos::Entity",
        from = "Column::ProductoId",
        to = "super::productos::Column::Id"
    )]
    Productos,
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::ResponsableId",
        to = "super::usuarios::Column::Id"
    )]
    Usuarios,
}

impl Related<super::productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productos.def()
    }
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuarios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
