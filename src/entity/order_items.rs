use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_img: String,
    pub spec_id: Uuid,
    pub spec_name: String,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::item_specs::Entity",
        from = "Column::SpecId",
        to = "super::item_specs::Column::Id"
    )]
    ItemSpecs,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::item_specs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemSpecs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
