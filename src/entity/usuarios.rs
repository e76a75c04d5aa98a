use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: String,
    pub activo: bool,
    pub fecha_creacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movimientos::Entity")]
    Movimientos,
    #[sea_orm(has_many = "super::pedidos::Entity")]
    Pedidos,
}

impl Related<super::movimientos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimientos.def()
    }
}

impl Related<super::pedidos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pedidos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
