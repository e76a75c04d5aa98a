use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "productos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sku: String,
    pub nombre: String,
    pub descripcion: String,
    pub categoria_id: Option<i32>,
    pub proveedor_id: Option<i32>,
    pub stock: i32,
    pub stock_minimo: i32,
    pub precio: f64,
    pub activo: bool,
    pub fecha_creacion: DateTimeWithTimeZone,
    pub fecha_actualizacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categorias::Entity",
        from = "Column::CategoriaId",
        to = "super::categorias::Column::Id"
    )]
    Categorias,
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedores::Column::Id"
    )]
    Proveedores,
    #[sea_orm(has_many = "super::movimientos::Entity")]
    Movimientos,
    #[sea_orm(has_many = "super::pedido_productos::Entity")]
    PedidoProductos,
    #[sea_orm(has_many = "super::alertas::Entity")]
    Alertas,
}

impl Related<super::categorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorias.def()
    }
}

impl Related<super::proveedores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedores.def()
    }
}

impl Related<super::movimientos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimientos.def()
    }
}

impl Related<super::pedido_productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PedidoProductos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
