use std::sync::Arc;

use async_trait::async_trait;
use cart_service::{
    model::{Cart, CartItem, Product, ProductId, Quantity, User},
    service::CartService,
    store::{
        memory::{InMemoryCartStore, InMemoryCatalog},
        CartStore, CatalogGateway, StoreError,
    },
    ErrorKind, ServiceError,
};

fn product(id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {}", id),
        category: "Kitchen".to_string(),
        cost: 25.0,
        rating: 4.5,
        image: format!("https://img.example.com/{}.png", id),
    }
}

fn quantity(value: u32) -> Quantity {
    Quantity::new(value).expect("positive quantity")
}

fn user(email: &str) -> User {
    User::new("Test User", email)
}

fn pid(id: &str) -> ProductId {
    ProductId::new(id)
}

struct Fixture {
    service: CartService,
    carts: InMemoryCartStore,
}

fn fixture() -> Fixture {
    let carts = InMemoryCartStore::new();
    let catalog = InMemoryCatalog::with_products(["p1", "p2", "p3"].map(product));
    let service = CartService::new(Arc::new(carts.clone()), Arc::new(catalog));
    Fixture { service, carts }
}

fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
    cart.items
        .iter()
        .map(|item| (item.product.id.as_str(), item.quantity.get()))
        .collect()
}

#[tokio::test]
async fn get_cart_without_cart_is_not_found() {
    let fixture = fixture();

    let error = fixture
        .service
        .get_cart_by_user(&user("a@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::CartNotFound));
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.to_string(), "User does not have a cart");
}

#[tokio::test]
async fn first_add_creates_cart_with_the_item() {
    let fixture = fixture();
    let a = user("a@x.com");

    let cart = fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(2))
        .await
        .unwrap();

    assert_eq!(cart.email, "a@x.com");
    assert_eq!(quantities(&cart), vec![("p1", 2)]);
    assert_eq!(fixture.service.get_cart_by_user(&a).await.unwrap(), cart);
}

#[tokio::test]
async fn add_appends_exactly_one_item() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();

    let cart = fixture
        .service
        .add_product_to_cart(&a, &pid("p2"), quantity(4))
        .await
        .unwrap();

    assert_eq!(quantities(&cart), vec![("p1", 1), ("p2", 4)]);
}

#[tokio::test]
async fn adding_the_same_product_twice_is_a_conflict() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(2))
        .await
        .unwrap();

    let error = fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(3))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::ProductAlreadyInCart));
    assert_eq!(error.kind().status_code(), 400);
    assert_eq!(
        error.to_string(),
        "Product already in cart. Use the cart sidebar to update or remove product from cart"
    );
    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert_eq!(quantities(&cart), vec![("p1", 2)]);
}

#[tokio::test]
async fn adding_an_unknown_product_is_an_invalid_reference() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();

    let error = fixture
        .service
        .add_product_to_cart(&a, &pid("missing"), quantity(1))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::ProductNotInDatabase));
    assert_eq!(error.kind(), ErrorKind::InvalidReference);
    assert_eq!(error.to_string(), "Product doesn't exist in database");
    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn unknown_product_does_not_create_a_cart() {
    let fixture = fixture();
    let a = user("a@x.com");

    let error = fixture
        .service
        .add_product_to_cart(&a, &pid("missing"), quantity(1))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::ProductNotInDatabase));
    assert_eq!(fixture.carts.cart_count().await, 0);
}

#[tokio::test]
async fn update_replaces_only_the_target_quantity() {
    let fixture = fixture();
    let a = user("a@x.com");
    for (id, count) in [("p1", 1), ("p2", 2), ("p3", 3)] {
        fixture
            .service
            .add_product_to_cart(&a, &pid(id), quantity(count))
            .await
            .unwrap();
    }

    let cart = fixture
        .service
        .update_product_in_cart(&a, &pid("p2"), quantity(9))
        .await
        .unwrap();

    assert_eq!(quantities(&cart), vec![("p1", 1), ("p2", 9), ("p3", 3)]);
}

#[tokio::test]
async fn update_without_cart_is_not_found() {
    let fixture = fixture();

    let error = fixture
        .service
        .update_product_in_cart(&user("a@x.com"), &pid("p1"), quantity(1))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::CartRequired));
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(
        error.to_string(),
        "User does not have a cart. Use POST to create cart and add a product"
    );
    assert_eq!(fixture.carts.cart_count().await, 0);
}

#[tokio::test]
async fn update_checks_catalog_before_cart_contents() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();

    let unknown = fixture
        .service
        .update_product_in_cart(&a, &pid("missing"), quantity(2))
        .await
        .unwrap_err();
    let absent = fixture
        .service
        .update_product_in_cart(&a, &pid("p2"), quantity(2))
        .await
        .unwrap_err();

    assert!(matches!(unknown, ServiceError::ProductNotInDatabase));
    assert!(matches!(absent, ServiceError::ProductNotInCart));
    assert_eq!(absent.kind(), ErrorKind::InvalidReference);
    assert_eq!(absent.to_string(), "Product not in cart");
}

#[tokio::test]
async fn delete_removes_the_item_once() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();
    fixture
        .service
        .add_product_to_cart(&a, &pid("p2"), quantity(1))
        .await
        .unwrap();

    fixture
        .service
        .delete_product_from_cart(&a, &pid("p1"))
        .await
        .unwrap();
    let again = fixture
        .service
        .delete_product_from_cart(&a, &pid("p1"))
        .await
        .unwrap_err();

    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert_eq!(quantities(&cart), vec![("p2", 1)]);
    assert!(matches!(again, ServiceError::ProductNotInCart));
}

#[tokio::test]
async fn delete_without_cart_is_not_found() {
    let fixture = fixture();

    let error = fixture
        .service
        .delete_product_from_cart(&user("a@x.com"), &pid("p1"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::CartNotFound));
    assert_eq!(error.kind().status_code(), 404);
}

#[tokio::test]
async fn repeated_reads_return_identical_state() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(2))
        .await
        .unwrap();

    let first = fixture.service.get_cart_by_user(&a).await.unwrap();
    let second = fixture.service.get_cart_by_user(&a).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn carts_of_different_users_are_independent() {
    let fixture = fixture();
    let a = user("a@x.com");
    let b = user("b@x.com");

    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();
    fixture
        .service
        .add_product_to_cart(&b, &pid("p1"), quantity(5))
        .await
        .unwrap();

    let cart_a = fixture.service.get_cart_by_user(&a).await.unwrap();
    let cart_b = fixture.service.get_cart_by_user(&b).await.unwrap();
    assert_eq!(quantities(&cart_a), vec![("p1", 1)]);
    assert_eq!(quantities(&cart_b), vec![("p1", 5)]);
}

#[tokio::test]
async fn full_cart_lifecycle() {
    let fixture = fixture();
    let a = user("a@x.com");

    let cart = fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(2))
        .await
        .unwrap();
    assert_eq!(quantities(&cart), vec![("p1", 2)]);

    let error = fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(3))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conflict);
    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert_eq!(quantities(&cart), vec![("p1", 2)]);

    let cart = fixture
        .service
        .update_product_in_cart(&a, &pid("p1"), quantity(5))
        .await
        .unwrap();
    assert_eq!(quantities(&cart), vec![("p1", 5)]);

    fixture
        .service
        .delete_product_from_cart(&a, &pid("p1"))
        .await
        .unwrap();
    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert!(cart.items.is_empty());

    let cart = fixture
        .service
        .add_product_to_cart(&a, &pid("p3"), quantity(1))
        .await
        .unwrap();
    assert_eq!(quantities(&cart), vec![("p3", 1)]);
    assert_eq!(fixture.carts.cart_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_never_lose_an_update() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();

    let handles: Vec<_> = ["p2", "p3"]
        .into_iter()
        .map(|id| {
            let service = fixture.service.clone();
            let a = a.clone();
            tokio::spawn(async move {
                service
                    .add_product_to_cart(&a, &ProductId::new(id), Quantity::new(1).unwrap())
                    .await
                    .map(|_| id)
            })
        })
        .collect();

    let mut added = vec!["p1"];
    for handle in handles {
        match handle.await.unwrap() {
            Ok(id) => added.push(id),
            Err(error) => assert!(error.is_retryable(), "unexpected error: {}", error),
        }
    }

    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    let mut stored: Vec<&str> = cart.items.iter().map(|i| i.product.id.as_str()).collect();
    stored.sort_unstable();
    added.sort_unstable();
    assert_eq!(stored, added);
}

#[tokio::test]
async fn stale_save_surfaces_a_retryable_conflict() {
    let fixture = fixture();
    let a = user("a@x.com");
    fixture
        .service
        .add_product_to_cart(&a, &pid("p1"), quantity(1))
        .await
        .unwrap();
    let stale = fixture.carts.find_one("a@x.com").await.unwrap().unwrap();
    fixture
        .service
        .add_product_to_cart(&a, &pid("p2"), quantity(1))
        .await
        .unwrap();

    let result = fixture.carts.save(&stale).await;

    assert!(matches!(result, Err(StoreError::WriteConflict { .. })));
    let error = ServiceError::from(result.unwrap_err());
    assert!(error.is_retryable());
    assert_eq!(error.kind().status_code(), 409);
    let cart = fixture.service.get_cart_by_user(&a).await.unwrap();
    assert_eq!(cart.items.len(), 2);
}

/// Cart store whose backend is unreachable for writes.
struct BrokenCartStore;

fn backend_down() -> StoreError {
    StoreError::Database(mongodb::error::Error::from(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

#[async_trait]
impl CartStore for BrokenCartStore {
    async fn find_one(&self, _owner: &str) -> Result<Option<Cart>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _owner: &str, _items: Vec<CartItem>) -> Result<Cart, StoreError> {
        Err(backend_down())
    }

    async fn save(&self, _cart: &Cart) -> Result<Cart, StoreError> {
        Err(backend_down())
    }
}

#[tokio::test]
async fn failed_creation_is_internal() {
    let catalog: Arc<dyn CatalogGateway> = Arc::new(InMemoryCatalog::with_products([product("p1")]));
    let service = CartService::new(Arc::new(BrokenCartStore), catalog);

    let error = service
        .add_product_to_cart(&user("a@x.com"), &pid("p1"), quantity(1))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::CartNotCreated(_)));
    assert_eq!(error.kind().status_code(), 500);
    assert!(!error.is_retryable());
    assert_eq!(error.to_string(), "Cart Not Created Something Went Wrong!!");
}

/// Cart store where another writer commits right after every load, so the loaded cart is stale.
struct InterleavedCartStore {
    inner: InMemoryCartStore,
}

#[async_trait]
impl CartStore for InterleavedCartStore {
    async fn find_one(&self, owner: &str) -> Result<Option<Cart>, StoreError> {
        let loaded = self.inner.find_one(owner).await?;
        match &loaded {
            Some(cart) => {
                self.inner.save(cart).await?;
            }
            None => {
                self.inner.create(owner, vec![]).await?;
            }
        }
        Ok(loaded)
    }

    async fn create(&self, owner: &str, items: Vec<CartItem>) -> Result<Cart, StoreError> {
        self.inner.create(owner, items).await
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, StoreError> {
        self.inner.save(cart).await
    }
}

fn interleaved_fixture() -> (CartService, InMemoryCartStore) {
    let inner = InMemoryCartStore::new();
    let catalog = InMemoryCatalog::with_products(["p1", "p2"].map(product));
    let service = CartService::new(
        Arc::new(InterleavedCartStore {
            inner: inner.clone(),
        }),
        Arc::new(catalog),
    );
    (service, inner)
}

fn assert_write_conflict(error: ServiceError) {
    assert_eq!(error.kind(), ErrorKind::WriteConflict);
    assert!(error.is_retryable());
    assert_eq!(error.kind().status_code(), 409);
}

#[tokio::test]
async fn concurrent_first_add_is_a_write_conflict() {
    let (service, inner) = interleaved_fixture();

    let error = service
        .add_product_to_cart(&user("a@x.com"), &pid("p1"), quantity(2))
        .await
        .unwrap_err();

    assert_write_conflict(error);
    let stored = inner.find_one("a@x.com").await.unwrap().unwrap();
    assert!(stored.items.is_empty());
}

#[tokio::test]
async fn stale_add_update_and_delete_are_write_conflicts() {
    let (service, inner) = interleaved_fixture();
    inner
        .create("a@x.com", vec![CartItem::new(product("p1"), quantity(1))])
        .await
        .unwrap();
    let a = user("a@x.com");

    let add = service
        .add_product_to_cart(&a, &pid("p2"), quantity(1))
        .await
        .unwrap_err();
    let update = service
        .update_product_in_cart(&a, &pid("p1"), quantity(5))
        .await
        .unwrap_err();
    let delete = service
        .delete_product_from_cart(&a, &pid("p1"))
        .await
        .unwrap_err();

    assert_write_conflict(add);
    assert_write_conflict(update);
    assert_write_conflict(delete);
    let stored = inner.find_one("a@x.com").await.unwrap().unwrap();
    assert_eq!(quantities(&stored), vec![("p1", 1)]);
    assert_eq!(stored.version, 3);
}
