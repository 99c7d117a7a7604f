use felino_domain::user::UserRole;
use felino_store::usecase::cart::{
    AddToCartUseCase, GetCartUseCase, RemoveFromCartUseCase, UpdateCartQuantityUseCase,
};
use felino_store::usecase::product::DeleteProductUseCase;
use uuid::Uuid;

use crate::helpers::{
    MemoryStore, MockCartRepo, MockProductRepo, MockUserRepo, assert_error, test_product,
    test_user,
};

fn add(store: &MemoryStore) -> AddToCartUseCase<MockUserRepo, MockProductRepo, MockCartRepo> {
    AddToCartUseCase {
        users: store.user_repo(),
        products: store.product_repo(),
        carts: store.cart_repo(),
    }
}

fn update(
    store: &MemoryStore,
) -> UpdateCartQuantityUseCase<MockUserRepo, MockProductRepo, MockCartRepo> {
    UpdateCartQuantityUseCase {
        users: store.user_repo(),
        products: store.product_repo(),
        carts: store.cart_repo(),
    }
}

fn setup(stock: i32) -> (MemoryStore, Uuid, Uuid) {
    let user = test_user("michi", UserRole::User);
    let product = test_product("Pienso", 20.0, stock);
    let store = MemoryStore::with_users(vec![user.clone()]);
    store.add_product(product.clone());
    (store, user.id, product.id)
}

// ── AddToCart ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_merge_repeated_adds_into_one_line() {
    let (store, user_id, product_id) = setup(10);

    add(&store).execute(user_id, product_id, 2).await.unwrap();
    let cart = add(&store).execute(user_id, product_id, 3).await.unwrap();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 5);
    assert_eq!(cart[0].product.id, product_id);
}

#[tokio::test]
async fn should_not_reserve_stock_when_adding() {
    let (store, user_id, product_id) = setup(4);

    add(&store).execute(user_id, product_id, 4).await.unwrap();
    assert_eq!(store.stock_of(product_id), 4);
}

#[tokio::test]
async fn should_reject_add_beyond_stock() {
    let (store, user_id, product_id) = setup(2);

    assert_error(
        add(&store).execute(user_id, product_id, 3).await,
        "INSUFFICIENT_STOCK",
    );
    assert!(store.cart.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_non_positive_add_and_unknown_product() {
    let (store, user_id, _) = setup(2);

    assert_error(
        add(&store).execute(user_id, Uuid::now_v7(), 0).await,
        "INVALID_INPUT",
    );
    assert_error(
        add(&store).execute(user_id, Uuid::now_v7(), 1).await,
        "PRODUCT_NOT_FOUND",
    );
}

// ── UpdateCartQuantity ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_line_when_quantity_set_to_zero() {
    let (store, user_id, product_id) = setup(10);
    add(&store).execute(user_id, product_id, 2).await.unwrap();

    let cart = update(&store).execute(user_id, product_id, 0).await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn should_check_only_the_increase_against_stock() {
    let (store, user_id, product_id) = setup(3);
    add(&store).execute(user_id, product_id, 2).await.unwrap();

    let cart = update(&store).execute(user_id, product_id, 5).await.unwrap();
    assert_eq!(cart[0].quantity, 5);

    assert_error(
        update(&store).execute(user_id, product_id, 9).await,
        "INSUFFICIENT_STOCK",
    );
}

#[tokio::test]
async fn should_allow_decrease_below_current_even_when_out_of_stock() {
    let (store, user_id, product_id) = setup(5);
    add(&store).execute(user_id, product_id, 5).await.unwrap();
    store.products.lock().unwrap()[0].stock = 0;

    let cart = update(&store).execute(user_id, product_id, 1).await.unwrap();
    assert_eq!(cart[0].quantity, 1);
}

#[tokio::test]
async fn should_reject_update_of_missing_line_and_negative_quantity() {
    let (store, user_id, product_id) = setup(5);

    assert_error(
        update(&store).execute(user_id, product_id, 1).await,
        "CART_ITEM_NOT_FOUND",
    );
    assert_error(
        update(&store).execute(user_id, product_id, -1).await,
        "INVALID_INPUT",
    );
}

// ── RemoveFromCart / GetCart ─────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_line_then_report_missing_on_repeat() {
    let (store, user_id, product_id) = setup(5);
    add(&store).execute(user_id, product_id, 1).await.unwrap();
    let remove = RemoveFromCartUseCase {
        users: store.user_repo(),
        carts: store.cart_repo(),
    };

    assert!(remove.execute(user_id, product_id).await.unwrap().is_empty());
    assert_error(
        remove.execute(user_id, product_id).await,
        "CART_ITEM_NOT_FOUND",
    );
}

#[tokio::test]
async fn should_drop_cart_lines_of_deleted_products() {
    let (store, user_id, product_id) = setup(5);
    add(&store).execute(user_id, product_id, 1).await.unwrap();

    DeleteProductUseCase {
        products: store.product_repo(),
    }
    .execute(product_id)
    .await
    .unwrap();

    let cart = GetCartUseCase {
        users: store.user_repo(),
        carts: store.cart_repo(),
    }
    .execute(user_id)
    .await
    .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn should_report_missing_user_for_cart_of_unknown_account() {
    let store = MemoryStore::default();
    let result = GetCartUseCase {
        users: store.user_repo(),
        carts: store.cart_repo(),
    }
    .execute(Uuid::now_v7())
    .await;
    assert_error(result, "USER_NOT_FOUND");
}
