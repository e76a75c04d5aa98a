use sea_orm::entity::prelude::*;

/// `estado` guarda el vocabulario de BD (pendiente, enviado, en_transito,
/// entregado, cancelado); el remapeo al vocabulario del frontend ocurre en
/// `crate::status`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pedidos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub numero_pedido: String,
    pub proveedor_id: Option<i32>,
    pub estado: String,
    pub fecha_entrega_estimada: Option<Date>,
    pub notas: String,
    pub creado_por: Option<i32>,
    pub monto_total: f64,
    pub fecha_creacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedores::Column::Id"
    )]
    Proveedores,
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::CreadoPor",
        to = "super::usuarios::Column::Id"
    )]
    Usuarios,
    #[sea_orm(has_many = "super::pedido_productos::Entity")]
    PedidoProductos,
}

impl Related<super::proveedores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedores.def()
    }
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuarios.def()
    }
}

impl Related<super::pedido_productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PedidoProductos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
