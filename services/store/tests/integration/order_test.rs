use felino_domain::user::UserRole;
use felino_store::domain::types::OrderLine;
use felino_store::usecase::order::{
    ListAllOrdersUseCase, ListUserOrdersUseCase, PlaceOrderInput, PlaceOrderUseCase,
};
use felino_store::usecase::product::DeleteProductUseCase;
use uuid::Uuid;

use crate::helpers::{MemoryStore, assert_error, test_product, test_user};

fn line(product_id: Uuid, quantity: i32) -> OrderLine {
    OrderLine {
        product_id,
        quantity,
    }
}

fn input(user_id: Uuid, items: Vec<OrderLine>) -> PlaceOrderInput {
    PlaceOrderInput {
        user_id,
        items,
        total_amount: 100.0,
    }
}

// ── PlaceOrder ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_decrement_stock_for_every_line() {
    let user = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 10);
    let arena = test_product("Arena", 5.0, 4);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(pienso.clone());
    store.add_product(arena.clone());

    let order = PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(
        user.id,
        input(user.id, vec![line(pienso.id, 3), line(arena.id, 4)]),
    )
    .await
    .unwrap();

    assert_eq!(order.user_id, user.id);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, Some(pienso.id));
    assert_eq!(store.stock_of(pienso.id), 7);
    assert_eq!(store.stock_of(arena.id), 0);
}

#[tokio::test]
async fn should_reject_retry_of_order_that_emptied_stock() {
    let user = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 2);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(pienso.clone());
    let usecase = PlaceOrderUseCase {
        orders: store.order_repo(),
    };

    usecase
        .execute(user.id, input(user.id, vec![line(pienso.id, 2)]))
        .await
        .unwrap();
    assert_eq!(store.stock_of(pienso.id), 0);

    let retry = usecase
        .execute(user.id, input(user.id, vec![line(pienso.id, 2)]))
        .await;
    assert_error(retry, "INSUFFICIENT_STOCK");
    assert_eq!(store.stock_of(pienso.id), 0);
    assert_eq!(store.orders.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_leave_stock_untouched_when_any_line_is_short() {
    let user = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 10);
    let arena = test_product("Arena", 5.0, 1);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(pienso.clone());
    store.add_product(arena.clone());

    let result = PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(
        user.id,
        input(user.id, vec![line(pienso.id, 3), line(arena.id, 2)]),
    )
    .await;

    assert_error(result, "INSUFFICIENT_STOCK");
    assert_eq!(store.stock_of(pienso.id), 10);
    assert_eq!(store.stock_of(arena.id), 1);
    assert!(store.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_count_repeated_product_lines_cumulatively() {
    let user = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 5);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(pienso.clone());

    let result = PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(
        user.id,
        input(user.id, vec![line(pienso.id, 3), line(pienso.id, 3)]),
    )
    .await;

    assert_error(result, "INSUFFICIENT_STOCK");
    assert_eq!(store.stock_of(pienso.id), 5);
}

#[tokio::test]
async fn should_reject_second_order_after_last_unit_sold() {
    let a = test_user("a", UserRole::User);
    let b = test_user("b", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 1);
    let store = MemoryStore::with_users(vec![a.clone(), b.clone()]);
    store.add_product(pienso.clone());
    let usecase = PlaceOrderUseCase {
        orders: store.order_repo(),
    };

    let first = usecase
        .execute(a.id, input(a.id, vec![line(pienso.id, 1)]))
        .await;
    let second = usecase
        .execute(b.id, input(b.id, vec![line(pienso.id, 1)]))
        .await;

    assert!(first.is_ok());
    assert_error(second, "INSUFFICIENT_STOCK");
    assert_eq!(store.stock_of(pienso.id), 0);
}

#[tokio::test]
async fn should_reject_order_on_behalf_of_another_user_before_validation() {
    let user = test_user("michi", UserRole::User);
    let store = MemoryStore::with_users(vec![user.clone()]);

    let result = PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(user.id, input(Uuid::now_v7(), vec![]))
    .await;
    assert_error(result, "FORBIDDEN");
}

#[tokio::test]
async fn should_reject_empty_or_invalid_lines() {
    let user = test_user("michi", UserRole::User);
    let store = MemoryStore::with_users(vec![user.clone()]);
    let usecase = PlaceOrderUseCase {
        orders: store.order_repo(),
    };

    assert_error(
        usecase.execute(user.id, input(user.id, vec![])).await,
        "INVALID_INPUT",
    );
    assert_error(
        usecase
            .execute(user.id, input(user.id, vec![line(Uuid::now_v7(), 0)]))
            .await,
        "INVALID_INPUT",
    );
    let negative_total = PlaceOrderInput {
        total_amount: -1.0,
        ..input(user.id, vec![line(Uuid::now_v7(), 1)])
    };
    assert_error(
        usecase.execute(user.id, negative_total).await,
        "INVALID_INPUT",
    );
}

#[tokio::test]
async fn should_report_unknown_product_without_side_effects() {
    let user = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 5);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(pienso.clone());

    let result = PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(
        user.id,
        input(user.id, vec![line(pienso.id, 1), line(Uuid::now_v7(), 1)]),
    )
    .await;

    assert_error(result, "PRODUCT_NOT_FOUND");
    assert_eq!(store.stock_of(pienso.id), 5);
}

// ── Listings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_own_orders_newest_first_with_products_resolved() {
    let me = test_user("michi", UserRole::User);
    let other = test_user("tom", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 10);
    let store = MemoryStore::with_users(vec![me.clone(), other.clone()]);
    store.add_product(pienso.clone());
    let place = PlaceOrderUseCase {
        orders: store.order_repo(),
    };
    let first = place
        .execute(me.id, input(me.id, vec![line(pienso.id, 1)]))
        .await
        .unwrap();
    place
        .execute(other.id, input(other.id, vec![line(pienso.id, 1)]))
        .await
        .unwrap();
    let second = place
        .execute(me.id, input(me.id, vec![line(pienso.id, 2)]))
        .await
        .unwrap();

    let views = ListUserOrdersUseCase {
        orders: store.order_repo(),
        products: store.product_repo(),
    }
    .execute(me.id)
    .await
    .unwrap();

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].order.id, second.id);
    assert_eq!(views[1].order.id, first.id);
    assert_eq!(views[0].products[0].as_ref().map(|p| p.id), Some(pienso.id));
    assert!(views[0].user.is_none());
}

#[tokio::test]
async fn should_keep_order_after_product_deletion_with_null_product() {
    let me = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 10);
    let store = MemoryStore::with_users(vec![me.clone()]);
    store.add_product(pienso.clone());
    PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(me.id, input(me.id, vec![line(pienso.id, 1)]))
    .await
    .unwrap();

    DeleteProductUseCase {
        products: store.product_repo(),
    }
    .execute(pienso.id)
    .await
    .unwrap();

    let views = ListUserOrdersUseCase {
        orders: store.order_repo(),
        products: store.product_repo(),
    }
    .execute(me.id)
    .await
    .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].order.items[0].product_id, None);
    assert_eq!(views[0].products, vec![None]);
}

#[tokio::test]
async fn should_attach_buyer_in_admin_listing() {
    let me = test_user("michi", UserRole::User);
    let pienso = test_product("Pienso", 20.0, 10);
    let store = MemoryStore::with_users(vec![me.clone()]);
    store.add_product(pienso.clone());
    PlaceOrderUseCase {
        orders: store.order_repo(),
    }
    .execute(me.id, input(me.id, vec![line(pienso.id, 1)]))
    .await
    .unwrap();

    let views = ListAllOrdersUseCase {
        orders: store.order_repo(),
        products: store.product_repo(),
        users: store.user_repo(),
    }
    .execute()
    .await
    .unwrap();

    let buyer = views[0].user.as_ref().unwrap();
    assert_eq!(buyer.id, me.id);
    assert_eq!(buyer.username, "michi");
}
