use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "alertas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tipo: String,
    pub titulo: String,
    pub mensaje: String,
    pub producto_id: Option<i32>,
    pub severidad: String,
    pub leida: bool,
    pub fecha_creacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::productos::Entity",
        from = "Column::ProductoId",
        to = "super::productos::Column::Id"
    )]
    Productos,
}

impl Related<super::productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
