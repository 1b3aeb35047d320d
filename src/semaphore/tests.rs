#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::semaphore::container::SemaphoreContainer;

    #[test]
    fn test_init_only_once() {
        let mut semaphore = SemaphoreContainer::new("s");
        assert!(semaphore.init(5).unwrap());
        assert!(!semaphore.init(7).unwrap());
        assert_eq!(semaphore.available(), 5);
    }

    #[test]
    fn test_init_fails_after_all_permits_acquired() {
        let mut semaphore = SemaphoreContainer::new("s");
        assert!(semaphore.init(3).unwrap());
        assert!(semaphore.try_acquire(3).unwrap());

        assert!(!semaphore.init(10).unwrap());
        assert_eq!(semaphore.available(), 0);
    }

    #[test]
    fn test_init_with_zero_permits_still_counts() {
        let mut semaphore = SemaphoreContainer::new("s");
        assert!(semaphore.init(0).unwrap());
        assert!(!semaphore.init(4).unwrap());
        assert_eq!(semaphore.available(), 0);
    }

    #[test]
    fn test_available_is_read_only() {
        let mut semaphore = SemaphoreContainer::new("s");
        semaphore.init(3).unwrap();

        for _ in 0..10 {
            assert_eq!(semaphore.available(), 3);
        }
        assert_eq!(semaphore.available(), 3);
    }

    #[test]
    fn test_try_acquire_and_release() {
        let mut semaphore = SemaphoreContainer::new("s");
        semaphore.init(2).unwrap();

        assert!(semaphore.try_acquire(2).unwrap());
        assert!(!semaphore.try_acquire(1).unwrap());
        assert_eq!(semaphore.available(), 0);

        semaphore.release(1).unwrap();
        assert_eq!(semaphore.available(), 1);
    }

    #[test]
    fn test_drain_reduce_increase() {
        let mut semaphore = SemaphoreContainer::new("s");
        semaphore.init(4).unwrap();

        assert_eq!(semaphore.drain(), 4);
        assert_eq!(semaphore.available(), 0);
        assert_eq!(semaphore.drain(), 0);

        semaphore.increase(3).unwrap();
        semaphore.reduce(5).unwrap();
        assert_eq!(semaphore.available(), -2);
        assert_eq!(semaphore.drain(), 0);
    }

    #[test]
    fn test_negative_permits_are_rejected() {
        let mut semaphore = SemaphoreContainer::new("s");
        let err = semaphore.init(-1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.field(), Some("permits"));

        assert!(semaphore.release(-3).is_err());
        assert_eq!(semaphore.available(), 0);
    }
}
